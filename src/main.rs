use clap::Parser;
use secure_vault::cli::{commands, init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Login => commands::login::execute(&cli),
        Commands::Store { ref data } => commands::store::execute(&cli, data.as_deref()),
        Commands::Retrieve { id } => commands::retrieve::execute(&cli, id),
        Commands::List => commands::list::execute(&cli),
        Commands::Dashboard => commands::dashboard::execute(&cli),
        Commands::Shell => commands::shell::execute(&cli),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        secure_vault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
