use anyhow::Context;
use booktracker_app::books::BookDto;
use booktracker_app::App;
use booktracker_kernel::settings::Settings;
use clap::{Args, Parser, Subcommand};

/// Booktracker command-line interface
#[derive(Parser, Debug)]
#[command(name = "booktracker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Manage books directly against the configured storage
    #[command(subcommand)]
    Books(BooksCommand),
}

#[derive(Subcommand, Debug)]
enum BooksCommand {
    /// List books as JSON
    List {
        /// Only books with this read status (true/false)
        #[arg(long)]
        read: Option<bool>,
    },
    /// Add a book and print it as JSON
    Add(AddArgs),
    /// Delete a book by id
    Delete {
        /// Book identifier
        id: i64,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Book title
    #[arg(long)]
    title: String,
    /// Book author
    #[arg(long)]
    author: String,
    /// Publication year
    #[arg(long)]
    year: i32,
    /// Mark the book as already read
    #[arg(long)]
    read: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings =
        Settings::load().with_context(|| "failed to load booktracker settings")?;
    booktracker_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        command = ?cli.command,
        "booktracker cli starting"
    );

    match cli.command {
        Command::Serve => App::build(settings)?.run().await,
        Command::Migrate => {
            let applied = App::build(settings)?.migrate()?;
            tracing::info!(applied, "cli migrate finished");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Books(command) => run_books(settings, command).await,
    }
}

async fn run_books(settings: Settings, command: BooksCommand) -> anyhow::Result<()> {
    let app = App::build(settings)?;
    // Make sure the schema exists before touching the table.
    app.migrate()?;
    let service = app.book_service();

    match command {
        BooksCommand::List { read } => {
            let books = service.list(read).await?;
            tracing::info!(filter = ?read, count = books.len(), "cli listed books");
            println!("{}", serde_json::to_string_pretty(&books)?);
        }
        BooksCommand::Add(args) => {
            let dto = BookDto::new(args.title, args.author, args.year, args.read);
            anyhow::ensure!(dto.validate().is_empty(), "title and author must not be blank");
            let created = service.create(dto).await?;
            tracing::info!(book_id = ?created.id, "cli added book");
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        BooksCommand::Delete { id } => {
            service.delete(id).await?;
            tracing::info!(book_id = id, "cli deleted book");
            println!("deleted book {id}");
        }
    }

    Ok(())
}
