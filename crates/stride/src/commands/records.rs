//! Running-record command handlers.

use tabled::Tabled;

use stride_core::model::record::{fmt_distance, fmt_duration, fmt_pace};
use stride_core::{Console, RunningRecord};

use crate::cli::{GlobalOpts, RecordsArgs, RecordsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Distance")]
    distance: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Pace")]
    pace: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Verified")]
    verified: String,
}

fn to_row(r: &RunningRecord, color: bool) -> RecordRow {
    let verified = if r.verified { "yes" } else { "no" };
    RecordRow {
        id: r.id.map(|id| id.to_string()).unwrap_or_default(),
        member: r.user_id.to_string(),
        distance: fmt_distance(r.distance_meters),
        duration: fmt_duration(r.duration_seconds),
        pace: fmt_pace(r.pace_secs_per_km()),
        date: r
            .record_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        verified: output::status_accent(verified, r.verified, color),
    }
}

fn detail(r: &RunningRecord) -> String {
    [
        format!("ID:       {}", r.id.map(|id| id.to_string()).unwrap_or_default()),
        format!("Member:   {}", r.user_id),
        format!("Distance: {} ({} m)", fmt_distance(r.distance_meters), r.distance_meters),
        format!("Duration: {}", fmt_duration(r.duration_seconds)),
        format!("Pace:     {}", fmt_pace(r.pace_secs_per_km())),
        format!(
            "Date:     {}",
            r.record_date
                .map_or_else(|| "-".into(), |d| d.to_rfc3339())
        ),
        format!("Verified: {}", if r.verified { "yes" } else { "no" }),
    ]
    .join("\n")
}

fn plain_id(r: &RunningRecord) -> String {
    r.id.map(|id| id.to_string()).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: RecordsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        RecordsCommand::List(list) => {
            let query = util::page_query(console, &list);
            console.records().fetch_list(&query).await?;
            let state = console.records().state();

            let out = output::render_list(
                &global.output,
                &state.entities,
                |r| to_row(r, color),
                plain_id,
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, crate::cli::OutputFormat::Table) {
                util::ack(
                    &output::page_footer(query.page, query.size, state.total_items),
                    global.quiet,
                );
            }
            Ok(())
        }

        RecordsCommand::Get { id } => {
            console.records().fetch_one(id).await?;
            let record =
                util::take_entity(console.records().state(), "record", id, "records list")?;
            let out = output::render_single(&global.output, &record, detail, plain_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordsCommand::Create {
            user,
            distance,
            duration,
            date,
        } => {
            if distance == 0 {
                return Err(CliError::Validation {
                    field: "distance".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            let draft = RunningRecord {
                id: None,
                user_id: user,
                distance_meters: distance,
                duration_seconds: duration,
                record_date: Some(date.unwrap_or_else(chrono::Utc::now)),
                verified: false,
            };
            console.records().create(draft).await?;
            let id = console
                .records()
                .state()
                .entity
                .and_then(|r| r.id)
                .unwrap_or_default();
            util::ack(&format!("Record {id} created"), global.quiet);
            Ok(())
        }

        RecordsCommand::Update {
            id,
            distance,
            duration,
            date,
        } => {
            console.records().fetch_one(id).await?;
            let mut record =
                util::take_entity(console.records().state(), "record", id, "records list")?;

            if let Some(distance) = distance {
                record.distance_meters = distance;
            }
            if let Some(duration) = duration {
                record.duration_seconds = duration;
            }
            if let Some(date) = date {
                record.record_date = Some(date);
            }

            console.records().update(record).await?;
            util::ack(&format!("Record {id} updated"), global.quiet);
            Ok(())
        }

        RecordsCommand::Verify { id } => {
            if !util::confirm(&format!("Mark record {id} as verified?"), global.yes)? {
                return Ok(());
            }
            console.records().fetch_one(id).await?;
            let mut record =
                util::take_entity(console.records().state(), "record", id, "records list")?;
            record.verified = true;
            console.records().update(record).await?;
            util::ack(&format!("Record {id} verified"), global.quiet);
            Ok(())
        }

        RecordsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete record {id}?"), global.yes)? {
                return Ok(());
            }
            console.records().remove(id).await?;
            util::ack(&format!("Record {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
