use chrono::{Local, Offset, Utc};
use clap::Args;
use focusplan_core::{
    parse_due_date, GoogleCalendarGateway, Scheduler, StaticCredentials, Task, WorkingHours,
};

#[derive(Args)]
pub struct ScheduleArgs {
    /// Task title
    #[arg(long)]
    pub title: String,

    /// Total duration in minutes
    #[arg(long)]
    pub duration: i64,

    /// Due date: "today", "tomorrow", YYYY-MM-DD, or RFC 3339.
    /// Defaults to one week from now.
    #[arg(long)]
    pub due: Option<String>,

    /// Manual chunk count (automatic one-hour chunks if omitted)
    #[arg(long)]
    pub chunks: Option<usize>,

    /// Minutes per manual chunk
    #[arg(long)]
    pub chunk_minutes: Option<i64>,

    /// Start of working hours (HH:MM, local time)
    #[arg(long, default_value = "09:00")]
    pub start: String,

    /// End of working hours (HH:MM, local time)
    #[arg(long, default_value = "18:00")]
    pub end: String,

    /// Google OAuth access token
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Google OAuth refresh token, enables refresh-on-expiry
    #[arg(long, env = "GOOGLE_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// OAuth client id (required for refresh)
    #[arg(long, env = "GOOGLE_CLIENT_ID", default_value = "")]
    pub client_id: String,

    /// OAuth client secret (required for refresh)
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true, default_value = "")]
    pub client_secret: String,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    // The gateway drives reqwest through the current runtime handle.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let hours = WorkingHours::new(&args.start, &args.end)?
        .with_offset(Local::now().offset().fix());

    let now = Utc::now();
    let due = parse_due_date(args.due.as_deref(), now, &hours);

    let mut task = Task::new(format!("task-{}", now.timestamp()), &args.title, args.duration, due);
    if let Some(count) = args.chunks {
        task = task.with_manual_chunks(count, args.chunk_minutes);
    }

    let mut credentials = StaticCredentials::new(&args.access_token);
    if let Some(refresh) = &args.refresh_token {
        credentials = credentials.with_refresh(refresh, &args.client_id, &args.client_secret);
    }
    let gateway = GoogleCalendarGateway::new(credentials, hours);

    let result = Scheduler::new().schedule_task(&task, &hours, &gateway)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
        for placed in &result.placed_slots {
            println!(
                "  chunk {}/{}: {} - {} ({} min)",
                placed.chunk.ordinal,
                placed.chunk.total,
                placed.interval.start.with_timezone(&Local),
                placed.interval.end.with_timezone(&Local),
                placed.chunk.duration_minutes,
            );
        }
        for id in &result.created_event_ids {
            println!("  event: {id}");
        }
    }

    if !result.success {
        return Err(result.message.into());
    }
    Ok(())
}
