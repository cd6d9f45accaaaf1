use clap::Parser;
use criteria_cli::{init_tracing, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&cli, &mut stdin.lock(), &mut stdout.lock())
}
