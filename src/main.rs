use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use setstats::views::{albums, geo, songs, summary, temporal, View};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "setstats", version, about = "Live-history analyzer for one artist's catalog and setlists")]
struct Cli {
    /// Catalog feed: a Discogs master JSON file or a directory of them
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Setlist feed: a setlist.fm JSON file or a directory of search pages
    #[arg(long, global = true)]
    setlists: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today; events on or after it are ignored
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Print views as JSON instead of text tables
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// General tour numbers: years, countries, cities, setlists
    Summary,

    /// Events per year
    Years,

    /// Events per month, split by continent
    Months,

    /// Events per day of the week
    Weekdays,

    /// Top countries by number of events
    Countries {
        /// Number of rows (defaults to config chart_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Top cities by number of events
    Cities {
        /// Number of rows (defaults to config chart_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Songs per setlist
    Sizes {
        /// Only setlists with at least one song
        #[arg(long)]
        filled: bool,
    },

    /// Most played songs
    Songs {
        /// Number of rows (defaults to config chart_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Most played songs not on any album
    NonAlbum {
        /// Number of rows (defaults to config non_album_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Share of each album in played songs
    AlbumShares,

    /// Album songs never or rarely played live
    Rare {
        /// Show every catalog song with its play count
        #[arg(long)]
        all: bool,
    },

    /// Most common opening and closing songs
    Edges {
        /// Number of rows (defaults to config edge_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Albums played per event year
    Albums {
        /// Every album in every year, zero-filled
        #[arg(long)]
        dense: bool,
    },

    /// First album released in each year
    Releases,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = setstats::config::AppConfig::load();

    // Resolve feed paths: CLI > config
    let catalog_path = cli
        .catalog
        .or(config.catalog_path.clone())
        .context("No catalog feed. Pass --catalog or set catalog_path in config.")?;
    let setlists_path = cli
        .setlists
        .or(config.setlists_path.clone())
        .context("No setlist feed. Pass --setlists or set setlists_path in config.")?;
    let today = cli.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    log::info!("Catalog: {}", catalog_path.display());
    log::info!("Setlists: {}", setlists_path.display());

    let catalog_records = setstats::feed::load_records(&catalog_path)
        .with_context(|| format!("Failed to load catalog feed {}", catalog_path.display()))?;
    let setlist_records = setstats::feed::load_records(&setlists_path)
        .with_context(|| format!("Failed to load setlist feed {}", setlists_path.display()))?;

    let data = setstats::pipeline::build(&catalog_records, &setlist_records, today)
        .context("Failed to build tables")?;
    if data.report.skipped() > 0 {
        log::warn!(
            "{} malformed records skipped (rerun with -v for details)",
            data.report.skipped()
        );
    }

    let joined = &data.joined;
    let display = &config.display;
    let json = cli.json;

    match cli.command {
        Commands::Summary => {
            let s = summary::tour_summary(joined);
            if json {
                return print_json(&s);
            }
            print_summary(&s);
        }

        Commands::Years => {
            let view = temporal::year_counts(joined);
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<6} {:>6} {:>7}", "Year", "Events", "Share"), 21);
            for r in &view.rows {
                println!("{:<6} {:>6} {:>6.1}%", r.year, r.count, r.percentage);
            }
        }

        Commands::Months => {
            let by_continent = temporal::month_counts(joined);
            let totals = temporal::month_totals(joined);
            if json {
                return print_json(&serde_json::json!({
                    "by_continent": by_continent,
                    "totals": totals,
                }));
            }
            print_header(&totals.title, &format!("{:<10} {:>14}  {}", "Month", "Events", "By continent"), 70);
            for t in &totals.rows {
                let split: Vec<String> = by_continent
                    .rows
                    .iter()
                    .filter(|r| r.month_number == t.month_number)
                    .map(|r| format!("{} {}", r.continent, r.count))
                    .collect();
                println!("{:<10} {:>14}  {}", t.month, t.label, split.join(", "));
            }
        }

        Commands::Weekdays => {
            let view = temporal::weekday_counts(joined);
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<10} {:>6} {:>7}", "Day", "Events", "Share"), 25);
            for r in &view.rows {
                println!("{:<10} {:>6} {:>6.1}%", r.day, r.count, r.percentage);
            }
        }

        Commands::Countries { limit } => {
            let view = geo::country_counts(joined);
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<30} {:>4} {:>6} {:>7}", "Country", "Code", "Events", "Share"), 50);
            for r in view.top(limit.unwrap_or(display.chart_rows)) {
                println!(
                    "{:<30} {:>4} {:>6} {:>6.1}%",
                    truncate(&r.country, 30),
                    r.country_code,
                    r.count,
                    r.percentage
                );
            }
        }

        Commands::Cities { limit } => {
            let view = geo::city_counts(joined);
            if json {
                return print_json(&view);
            }
            print_header(
                &view.title,
                &format!("{:<25} {:<20} {:>8} {:>9} {:>6} {:>7}", "City", "Country", "Lat", "Long", "Events", "Share"),
                80,
            );
            for r in view.top(limit.unwrap_or(display.chart_rows)) {
                println!(
                    "{:<25} {:<20} {:>8.3} {:>9.3} {:>6} {:>6.1}%",
                    truncate(&r.city, 25),
                    truncate(&r.country, 20),
                    r.latitude,
                    r.longitude,
                    r.count,
                    r.percentage
                );
            }
        }

        Commands::Sizes { filled } => {
            let view = if filled {
                songs::filled_setlist_sizes(joined)
            } else {
                songs::setlist_sizes(joined)
            };
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<12} {:>5}", "Setlist", "Songs"), 18);
            for r in &view.rows {
                println!("{:<12} {:>5}", r.setlist_id, r.count);
            }
        }

        Commands::Songs { limit } => {
            let view = songs::song_ranking(joined);
            if json {
                return print_json(&view);
            }
            print_song_table(&view, limit.unwrap_or(display.chart_rows));
        }

        Commands::NonAlbum { limit } => {
            let view = songs::non_album_songs(joined);
            if json {
                return print_json(&view);
            }
            print_song_table(&view, limit.unwrap_or(display.non_album_rows));
        }

        Commands::AlbumShares => {
            let view = albums::album_shares(joined);
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<40} {:>6} {:>7}", "Album", "Plays", "Share"), 55);
            for r in &view.rows {
                println!("{:<40} {:>6} {:>6.1}%", truncate(&r.label, 40), r.count, r.percentage);
            }
        }

        Commands::Rare { all } => {
            let views = if all {
                vec![songs::rare_songs(&data.catalog, joined)]
            } else {
                vec![
                    songs::never_played(&data.catalog, joined),
                    songs::rarely_played(&data.catalog, joined),
                ]
            };
            if json {
                return print_json(&views);
            }
            for view in &views {
                print_header(&view.title, &format!("{:<35} {:<35} {:>5}", "Song", "Album", "Plays"), 77);
                for r in &view.rows {
                    println!(
                        "{:<35} {:<35} {:>5}",
                        truncate(&r.song, 35),
                        truncate(&albums::legend_label(&r.album, r.release_year), 35),
                        r.count
                    );
                }
                println!();
            }
        }

        Commands::Edges { limit } => {
            let first = songs::first_songs(joined);
            let last = songs::last_songs(joined);
            if json {
                return print_json(&serde_json::json!({ "first": first, "last": last }));
            }
            let n = limit.unwrap_or(display.edge_rows);
            for view in [&first, &last] {
                print_header(&view.title, &format!("{:<35} {:>6} {:>7}", "Song", "Shows", "Share"), 50);
                for r in view.top(n) {
                    println!("{:<35} {:>6} {:>6.1}%", truncate(&r.song, 35), r.count, r.percentage);
                }
                println!();
            }
        }

        Commands::Albums { dense } => {
            let view = if dense {
                albums::album_over_time_dense(joined)
            } else {
                albums::album_over_time(joined)
            };
            if json {
                return print_json(&view);
            }
            print_header(&view.title, &format!("{:<40} {:>6} {:>6} {:>7}", "Album", "Year", "Songs", "Share"), 62);
            for r in &view.rows {
                println!(
                    "{:<40} {:>6} {:>6} {:>6.1}%",
                    truncate(&r.label, 40),
                    r.event_year,
                    r.count,
                    r.percentage
                );
            }
        }

        Commands::Releases => {
            let markers = albums::release_markers(&data.catalog);
            if json {
                return print_json(&markers);
            }
            println!("{:<6} {}", "Year", "Album");
            println!("{}", "-".repeat(40));
            for m in &markers {
                println!("{:<6} {}", m.release_year, m.album);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Title, column header and rule.
fn print_header(title: &str, columns: &str, width: usize) {
    println!("{title}");
    println!();
    println!("{columns}");
    println!("{}", "-".repeat(width));
}

fn print_song_table(view: &View<songs::SongCount>, limit: usize) {
    print_header(
        &view.title,
        &format!("{:<35} {:<35} {:>6} {:>7}", "Song", "Album", "Shows", "Share"),
        86,
    );
    if view.is_empty() {
        println!("(no filled setlists)");
        return;
    }
    for r in view.top(limit) {
        println!(
            "{:<35} {:<35} {:>6} {:>6.1}%",
            truncate(&r.song, 35),
            truncate(&albums::legend_label(&r.album, r.release_year), 35),
            r.count,
            r.percentage
        );
    }
}

fn print_summary(s: &summary::TourSummary) {
    println!("{}", s.artist);
    println!();
    match (s.first_year, s.last_year) {
        (Some(first), Some(last)) => {
            println!("Years on Tour: {} (from {first} to {last})", s.years_on_tour)
        }
        _ => println!("Years on Tour: 0"),
    }
    println!("Visited Countries: {}", s.countries);
    println!("Visited Cities: {}", s.cities);
    println!("Events: {}", s.events);
    println!("Filled Setlists: {}", s.filled_setlists);
    match s.empty_share {
        Some(share) => println!("Empty Setlists: {} ({share:.1}%)", s.empty_setlists),
        None => println!("Empty Setlists: {}", s.empty_setlists),
    }
    if let Some(median) = s.median_filled_size {
        println!("Median Number of Songs for Filled Setlists: {median}");
    }
}

/// Cut long text to `width` characters.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
