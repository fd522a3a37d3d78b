mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cafe_attendance::{AttendanceRemote, AttendanceService, ClockGateway, PunchCache};
use cafe_catalog::{Catalog, StaffId};
use cafe_kvcache::{FileStore, KvStore};
use cafe_scheduling::{
    AllocationService, ScheduleRemote, SessionMode, SheetGateway, ShiftCache,
};

use crate::config::AppConfig;

/// Staff session tool for the cafe shift engine.
#[derive(Parser)]
#[command(name = "cafe-session")]
#[command(about = "Sync, inspect and migrate cafe shift and attendance records")]
#[command(version)]
struct Cli {
    /// Path to the session configuration file
    #[arg(short, long, default_value = "cafe.yaml")]
    config: PathBuf,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the shift record set with the remote service
    Sync,
    /// Show slot fill levels and punches for one date
    Status {
        /// Date to inspect (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Limit the view to one staff id
        #[arg(long)]
        staff: Option<String>,
    },
    /// Import records left behind by the predecessor systems
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let session = Session::build(config)?;

    match cli.command {
        Commands::Sync => sync(&session).await,
        Commands::Status { date, staff } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            status(&session, date, staff.map(StaffId::new)).await
        }
        Commands::Migrate => migrate(&session),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct Session {
    catalog: Arc<Catalog>,
    store: Arc<dyn KvStore>,
    allocation: AllocationService,
    attendance: AttendanceService,
    conflict_policy: cafe_scheduling::ConflictPolicy,
}

impl Session {
    fn build(config: AppConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::new(config.catalog).context("invalid season catalog")?);
        let store: Arc<dyn KvStore> = Arc::new(
            FileStore::open(&config.cache_dir).with_context(|| {
                format!("opening cache directory {}", config.cache_dir.display())
            })?,
        );

        let remote = config.remote.filter(cafe_remote::RemoteConfig::is_configured);
        let schedule_remote: Option<Arc<dyn ScheduleRemote>> = remote
            .as_ref()
            .map(|r| {
                SheetGateway::new(r, Arc::clone(&catalog))
                    .map(|g| Arc::new(g) as Arc<dyn ScheduleRemote>)
            })
            .transpose()
            .context("building remote shift gateway")?;
        let attendance_remote: Option<Arc<dyn AttendanceRemote>> = remote
            .as_ref()
            .map(|r| {
                ClockGateway::new(r, Arc::clone(&catalog))
                    .map(|g| Arc::new(g) as Arc<dyn AttendanceRemote>)
            })
            .transpose()
            .context("building remote attendance gateway")?;

        let allocation = AllocationService::new(
            Arc::clone(&catalog),
            schedule_remote,
            ShiftCache::new(Arc::clone(&store)),
        );
        let attendance = AttendanceService::new(
            Arc::clone(&catalog),
            attendance_remote,
            PunchCache::new(Arc::clone(&store)),
        );

        Ok(Self {
            catalog,
            store,
            allocation,
            attendance,
            conflict_policy: config.scheduling.conflict_policy,
        })
    }
}

async fn sync(session: &Session) -> Result<()> {
    let report = session.allocation.sync().await?;
    let mode = match report.mode {
        SessionMode::Online => "online",
        SessionMode::CacheOnly => "cache-only",
    };
    println!("{mode}: {} shift assignments", report.assignments);
    Ok(())
}

async fn status(session: &Session, date: NaiveDate, staff: Option<StaffId>) -> Result<()> {
    session.allocation.sync().await?;
    let punches = session.attendance.load_day(date).await?;

    if !session.catalog.is_operating_date(date) {
        println!("{date}: not an operating date");
        return Ok(());
    }

    println!("{date}:");
    for slot in session.catalog.available_slots(date) {
        let state = session.allocation.fill_state(date, &slot.id, staff.as_ref());
        let line = match state {
            cafe_scheduling::FillState::Mine => "yours".to_owned(),
            cafe_scheduling::FillState::Full { count, required } => {
                format!("full ({count}/{required})")
            }
            cafe_scheduling::FillState::Partial { count, required } => {
                format!("open ({count}/{required})")
            }
            cafe_scheduling::FillState::Empty { required } => format!("empty (0/{required})"),
        };
        println!("  {} {}  {}", slot.label, slot_window(slot), line);
    }

    if let Some(staff_id) = staff {
        let summary = session.attendance.day_summary(&staff_id, date);
        println!(
            "  {} punches, worked {}",
            session
                .attendance
                .punches_for(&staff_id, date)
                .len(),
            summary.formatted_total()
        );
    } else {
        println!("  {} punches recorded", punches.len());
    }
    Ok(())
}

fn slot_window(slot: &cafe_catalog::Slot) -> String {
    format!(
        "{}-{}",
        cafe_catalog::timefmt::format_hhmm(slot.start),
        cafe_catalog::timefmt::format_hhmm(slot.end)
    )
}

fn migrate(session: &Session) -> Result<()> {
    let shifts = cafe_scheduling::migrate_legacy_shifts(
        &session.store,
        &session.catalog,
        session.conflict_policy,
    )?;
    println!(
        "shifts: {} imported, {} duplicates, {} skipped",
        shifts.imported, shifts.duplicates, shifts.skipped
    );

    let punches = cafe_attendance::migrate_legacy_punches(&session.store, &session.catalog)?;
    println!(
        "punches: {} imported, {} duplicates, {} skipped",
        punches.imported, punches.duplicates, punches.skipped
    );
    Ok(())
}
