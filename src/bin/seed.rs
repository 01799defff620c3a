use clap::Parser;

use polyglot_press::{
    config::{self, TranslationPattern},
    error::Result,
    init_tracing,
    seed::{Profile, Seeder},
    storage::{new_db_poll, schema},
};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Generate demo and benchmark data for the active translation pattern")]
struct Cli {
    /// Data size profile
    #[arg(value_enum, default_value_t = Profile::Default)]
    profile: Profile,

    /// Drop and recreate the pattern's tables before seeding
    #[arg(long)]
    init_schema: bool,

    /// Translation pattern, defaults to `TRANSLATION_PATTERN`
    #[arg(long)]
    pattern: Option<TranslationPattern>,

    /// Fixed RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(%e, "seeding failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let pattern = match cli.pattern {
        Some(pattern) => pattern,
        None => TranslationPattern::from_env()?,
    };
    let pool = new_db_poll(&config::database_url(pattern)?).await?;
    tracing::info!(%pattern, profile = ?cli.profile, "connected to database");

    if cli.init_schema {
        schema::apply(&pool, pattern).await?;
    }

    let mut seeder = Seeder::new(pattern, pool.clone(), cli.profile.config());
    if let Some(seed) = cli.seed {
        seeder = seeder.with_seed(seed);
    }
    let counts = seeder.run().await?;

    println!("Data summary ({pattern}):");
    println!("  categories:   {}", counts.categories);
    println!("  articles:     {}", counts.articles);
    println!("  published:    {}", counts.published_articles);
    println!("  translations: {}", counts.translations);

    pool.close().await;
    Ok(())
}
