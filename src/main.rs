use gamescout::db::{self, init_db, Database};
use gamescout::domain::Consolidator;
use gamescout::filters::FilterSpec;
use gamescout::query::{BasicSearchResolver, Projection, QueryBuilder};

fn main() {
    env_logger::init();

    // 1. Open the snapshot (path from argv, default alongside the binary).
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "games.sqlite3".to_string());
    let database = Database::new(path);

    if let Err(e) = init_db(&database, "sql/schema.sql") {
        eprintln!("❌ Snapshot initialization failed: {e}");
        std::process::exit(1);
    }

    // 2. Run a default query cycle end to end.
    let builder = QueryBuilder::new();
    let consolidator = Consolidator::new();
    let spec = FilterSpec::default();

    let query = builder.build(&spec, &BasicSearchResolver, Projection::Full);
    let output = match db::execute(&database, &query) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("❌ Query failed: {e}");
            std::process::exit(1);
        }
    };

    let games = consolidator.project(&output);
    let stats = consolidator.aggregate(&games);

    // 3. Print the stats header and a short listing.
    println!(
        "{} games ({} free) · max price €{:.2} · avg rating {:.1}% · {} channels · {} tags",
        stats.total_games,
        stats.free_games,
        stats.max_price,
        stats.average_rating,
        stats.channel_count,
        stats.tag_count
    );
    for game in games.iter().take(10) {
        println!(
            "  {} [{}] {}",
            game.name,
            game.platform,
            game.positive_review_percentage
                .map(|r| format!("{r}%"))
                .unwrap_or_else(|| "unrated".to_string())
        );
    }
}
