//! freshcache CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freshcache::cli::logs::LogsAction;
use freshcache::cli::plants::PlantsAction;
use freshcache::cli::tasks::TasksAction;
use freshcache::cli::title::TitleAction;
use freshcache::cli::{Cli, Commands, OutputFormat};
use freshcache::output::{format_output, pretty};
use freshcache::{
    CachedRepository, Config, InMemoryStore, Logger, PlantCatalog, RepositoryOptions, WriteOutcome,
};
use freshcache_client::{HttpClient, HttpRemoteSource};
use freshcache_core::models::{GrowZone, Log, Plant, Task, Title};
use freshcache_core::storage::LocalStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freshcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(url) = &cli.remote_url {
        config.remote_url = url.clone();
    }
    if let Some(db) = &cli.db {
        config.sqlite_path = db.display().to_string();
    }

    let client = HttpClient::with_timeout(config.remote_url.clone(), config.fetch_timeout());
    tracing::debug!(remote = %config.remote_url, "Using remote");

    open_and_run(&cli, &config, client).await
}

#[cfg(feature = "sqlite")]
async fn open_and_run(cli: &Cli, config: &Config, client: HttpClient) -> Result<()> {
    use freshcache::SqliteStore;

    if cli.in_memory {
        return run_in_memory(cli, config, client).await;
    }

    tracing::debug!(path = %config.sqlite_path, "Opening SQLite store");
    let plants = SqliteStore::<Plant>::new(&config.sqlite_path).await?;
    let conn = plants.connection().clone();
    let titles = SqliteStore::<Title>::from_connection(conn.clone()).await?;
    let tasks = SqliteStore::<Task>::from_connection(conn.clone()).await?;
    let logs = SqliteStore::<Log>::from_connection(conn).await?;

    run(
        cli,
        config.repository_options(),
        client,
        Stores {
            plants: Arc::new(plants),
            titles: Arc::new(titles),
            tasks: Arc::new(tasks),
            logs: Arc::new(logs),
        },
    )
    .await
}

#[cfg(not(feature = "sqlite"))]
async fn open_and_run(cli: &Cli, config: &Config, client: HttpClient) -> Result<()> {
    if !cli.in_memory {
        tracing::warn!("Built without SQLite support, records are kept in memory");
    }
    run_in_memory(cli, config, client).await
}

async fn run_in_memory(cli: &Cli, config: &Config, client: HttpClient) -> Result<()> {
    run(
        cli,
        config.repository_options(),
        client,
        Stores {
            plants: Arc::new(InMemoryStore::<Plant>::new()),
            titles: Arc::new(InMemoryStore::<Title>::new()),
            tasks: Arc::new(InMemoryStore::<Task>::new()),
            logs: Arc::new(InMemoryStore::<Log>::new()),
        },
    )
    .await
}

/// One local store per record kind.
struct Stores<P, T, K, G> {
    plants: Arc<P>,
    titles: Arc<T>,
    tasks: Arc<K>,
    logs: Arc<G>,
}

async fn run<P, T, K, G>(
    cli: &Cli,
    options: RepositoryOptions,
    client: HttpClient,
    stores: Stores<P, T, K, G>,
) -> Result<()>
where
    P: LocalStore<Plant> + 'static,
    T: LocalStore<Title> + 'static,
    K: LocalStore<Task> + 'static,
    G: LocalStore<Log> + 'static,
{
    let Stores {
        plants,
        titles,
        tasks,
        logs,
    } = stores;

    match &cli.command {
        Commands::Plants(cmd) => {
            let remote = Arc::new(HttpRemoteSource::<Plant>::new(client));
            let repository = CachedRepository::new(plants, remote.clone(), options);
            run_plants(cli, PlantCatalog::new(repository, remote), &cmd.action).await
        }
        Commands::Title(cmd) => {
            let remote = Arc::new(HttpRemoteSource::<Title>::new(client));
            run_title(cli, CachedRepository::new(titles, remote, options), &cmd.action).await
        }
        Commands::Tasks(cmd) => {
            let remote = Arc::new(HttpRemoteSource::<Task>::new(client));
            run_tasks(cli, CachedRepository::new(tasks, remote, options), &cmd.action).await
        }
        Commands::Logs(cmd) => run_logs(cli, Logger::new(logs), &cmd.action).await,
    }
}

async fn run_plants<P>(
    cli: &Cli,
    catalog: PlantCatalog<P, HttpRemoteSource<Plant>, HttpRemoteSource<Plant>>,
    action: &PlantsAction,
) -> Result<()>
where
    P: LocalStore<Plant> + 'static,
{
    match action {
        PlantsAction::List { zone, refresh } => {
            catalog.select_grow_zone(zone.map(GrowZone));
            if *refresh {
                catalog.refresh().await?;
                if let Some(err) = catalog.errors().borrow().as_ref() {
                    eprintln!("Refresh failed, showing local data: {err}");
                }
            }
            let plants = catalog.plants().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&plants, cli.format)?),
                OutputFormat::Pretty => println!("{}", pretty::format_plants(&plants)),
            }
        }
        PlantsAction::Refresh { zone, force } => {
            let repository = catalog.repository();
            let outcome = match (zone.map(GrowZone), *force) {
                (Some(zone), false) => repository.refresh_group(&zone.group()).await?,
                (Some(zone), true) => repository.force_refresh_group(&zone.group()).await?,
                (None, false) => repository.refresh_all().await?,
                (None, true) => repository.force_refresh_all().await?,
            };
            if !cli.quiet {
                println!("{}", pretty::format_refresh("plants", outcome));
            }
        }
        PlantsAction::Get { id, force } => {
            let plant = catalog.repository().get(id, *force).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&plant, cli.format)?),
                OutputFormat::Pretty => println!("{}", pretty::format_plant(&plant)),
            }
        }
    }
    Ok(())
}

async fn run_title<T>(
    cli: &Cli,
    repository: CachedRepository<Title, T, HttpRemoteSource<Title>>,
    action: &TitleAction,
) -> Result<()>
where
    T: LocalStore<Title> + 'static,
{
    match action {
        TitleAction::Show { refresh } => {
            if *refresh {
                if let Err(err) = repository.refresh(&Title::CURRENT).await {
                    eprintln!("Refresh failed, showing local data: {err}");
                }
            }
            let title = repository.read(&Title::CURRENT).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&title, cli.format)?),
                OutputFormat::Pretty => println!("{}", pretty::format_title(title.as_ref())),
            }
        }
        TitleAction::Refresh { force } => {
            let outcome = if *force {
                repository.force_refresh(&Title::CURRENT).await?
            } else {
                repository.refresh(&Title::CURRENT).await?
            };
            if !cli.quiet {
                println!("{}", pretty::format_refresh("title", outcome));
            }
        }
    }
    Ok(())
}

async fn run_tasks<K>(
    cli: &Cli,
    repository: CachedRepository<Task, K, HttpRemoteSource<Task>>,
    action: &TasksAction,
) -> Result<()>
where
    K: LocalStore<Task> + 'static,
{
    match action {
        TasksAction::List { all, refresh } => {
            let mut tasks = match repository.get_tasks(*refresh).await {
                Ok(tasks) => tasks,
                Err(err) if *refresh => {
                    eprintln!("Refresh failed, showing local data: {err}");
                    repository.read_all().await?
                }
                Err(err) => return Err(err.into()),
            };
            if !*all {
                tasks.retain(Task::is_active);
            }
            tasks.sort_by(|a, b| a.title_for_list().cmp(b.title_for_list()));
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&tasks, cli.format)?),
                OutputFormat::Pretty => println!("{}", pretty::format_tasks(&tasks)),
            }
        }
        TasksAction::Add { title, description } => {
            let task = Task::new(title.clone(), description.clone());
            let outcome = repository.write(&task).await?;
            print_write(cli, "Saved", &task, &outcome)?;
        }
        TasksAction::Complete { id } => {
            let (task, outcome) = repository.complete_task(id).await?;
            print_write(cli, "Completed", &task, &outcome)?;
        }
        TasksAction::Activate { id } => {
            let (task, outcome) = repository.activate_task(id).await?;
            print_write(cli, "Activated", &task, &outcome)?;
        }
        TasksAction::ClearCompleted => {
            let outcome = repository.clear_completed_tasks().await?;
            if !cli.quiet {
                println!("{}", pretty::format_write("Cleared completed tasks", &outcome));
            }
        }
        TasksAction::DeleteAll => {
            let outcome = repository.delete_all().await?;
            if !cli.quiet {
                println!("{}", pretty::format_write("Deleted all tasks", &outcome));
            }
        }
        TasksAction::Delete { id } => {
            let outcome = repository.delete(id).await?;
            if !cli.quiet {
                println!("{}", pretty::format_write(&format!("Deleted task {id}"), &outcome));
            }
        }
        TasksAction::Refresh { force } => {
            let outcome = if *force {
                repository.force_refresh_all().await?
            } else {
                repository.refresh_all().await?
            };
            if !cli.quiet {
                println!("{}", pretty::format_refresh("tasks", outcome));
            }
        }
    }
    Ok(())
}

async fn run_logs<G>(cli: &Cli, logger: Logger<G>, action: &LogsAction) -> Result<()>
where
    G: LocalStore<Log> + 'static,
{
    match action {
        LogsAction::List => {
            let logs = logger.all_logs().await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&logs, cli.format)?),
                OutputFormat::Pretty => println!("{}", pretty::format_logs(&logs)),
            }
        }
        LogsAction::Add { msg } => {
            let log = logger.add_log(msg.clone()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&log, cli.format)?),
                OutputFormat::Pretty => {
                    if !cli.quiet {
                        println!("{}", pretty::format_logs(std::slice::from_ref(&log)));
                    }
                }
            }
        }
        LogsAction::Clear => {
            logger.remove_logs().await?;
            if !cli.quiet {
                println!("Logs removed.");
            }
        }
    }
    Ok(())
}

fn print_write(cli: &Cli, action: &str, task: &Task, outcome: &WriteOutcome) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", format_output(task, cli.format)?),
        OutputFormat::Pretty => {
            if !cli.quiet {
                println!("{}", pretty::format_write(action, outcome));
            }
            println!("{}", pretty::format_task(task));
        }
    }
    Ok(())
}
