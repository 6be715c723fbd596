use chrono::{DateTime, Local, Offset, Utc};
use clap::Args;
use focusplan_core::{
    parse_due_date, CalendarGateway, GatewayError, Interval, Scheduler, Task, WorkingHours,
};

#[derive(Args)]
pub struct PlanArgs {
    /// Task title
    #[arg(long, default_value = "Untitled task")]
    pub title: String,

    /// Total duration in minutes
    #[arg(long)]
    pub duration: i64,

    /// Due date: "today", "tomorrow", YYYY-MM-DD, or RFC 3339
    #[arg(long)]
    pub due: Option<String>,

    /// Manual chunk count
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
}

/// Gateway that creates nothing; the preview assumes an empty calendar.
struct DryRunGateway;

impl CalendarGateway for DryRunGateway {
    fn list_busy(
        &self,
        _range_start: DateTime<Utc>,
        _range_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>, GatewayError> {
        Ok(Vec::new())
    }

    fn create_event(&self, _label: &str, _interval: &Interval) -> Result<String, GatewayError> {
        Ok("(dry run)".to_string())
    }
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let hours = WorkingHours::new(&args.start, &args.end)?
        .with_offset(Local::now().offset().fix());

    let now = Utc::now();
    let due = parse_due_date(args.due.as_deref(), now, &hours);

    let mut task = Task::new("plan-preview", &args.title, args.duration, due);
    if let Some(count) = args.chunks {
        task = task.with_manual_chunks(count, args.chunk_minutes);
    }

    let result = Scheduler::new().schedule_task(&task, &hours, &DryRunGateway)?;

    println!("due: {}", due.with_timezone(&Local));
    println!("chunks: {}", result.total_chunks);
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
    if !result.success {
        println!("{}", result.message);
    }
    Ok(())
}
