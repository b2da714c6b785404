//! Training-group command handlers.

use tabled::Tabled;

use stride_core::{Console, RunningGroup};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Leader")]
    leader: String,
    #[tabled(rename = "Members")]
    members: String,
}

fn to_row(g: &RunningGroup) -> GroupRow {
    GroupRow {
        id: g.id.map(|id| id.to_string()).unwrap_or_default(),
        name: g.name.clone(),
        leader: g.leader_id.map(|id| id.to_string()).unwrap_or_default(),
        members: g.member_count.map(|c| c.to_string()).unwrap_or_default(),
    }
}

fn detail(g: &RunningGroup) -> String {
    [
        format!("ID:      {}", g.id.map(|id| id.to_string()).unwrap_or_default()),
        format!("Name:    {}", g.name),
        format!(
            "Leader:  {}",
            g.leader_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!(
            "Members: {}",
            g.member_count.map_or_else(|| "-".into(), |c| c.to_string())
        ),
        format!(
            "Created: {}",
            g.created_date
                .map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d").to_string())
        ),
    ]
    .join("\n")
}

fn plain_id(g: &RunningGroup) -> String {
    g.id.map(|id| id.to_string()).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List(list) => {
            let query = util::page_query(console, &list);
            console.groups().fetch_list(&query).await?;
            let state = console.groups().state();

            let out = output::render_list(&global.output, &state.entities, to_row, plain_id);
            output::print_output(&out, global.quiet);
            if matches!(global.output, crate::cli::OutputFormat::Table) {
                util::ack(
                    &output::page_footer(query.page, query.size, state.total_items),
                    global.quiet,
                );
            }
            Ok(())
        }

        GroupsCommand::Get { id } => {
            console.groups().fetch_one(id).await?;
            let group = util::take_entity(console.groups().state(), "group", id, "groups list")?;
            let out = output::render_single(&global.output, &group, detail, plain_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Create { name, leader } => {
            let draft = RunningGroup {
                id: None,
                name,
                leader_id: leader,
                member_count: None,
                created_date: None,
            };
            console.groups().create(draft).await?;
            let id = console
                .groups()
                .state()
                .entity
                .and_then(|g| g.id)
                .unwrap_or_default();
            util::ack(&format!("Group {id} created"), global.quiet);
            Ok(())
        }

        GroupsCommand::Update { id, name, leader } => {
            console.groups().fetch_one(id).await?;
            let mut group =
                util::take_entity(console.groups().state(), "group", id, "groups list")?;

            if let Some(name) = name {
                group.name = name;
            }
            if let Some(leader) = leader {
                group.leader_id = Some(leader);
            }

            console.groups().update(group).await?;
            util::ack(&format!("Group {id} updated"), global.quiet);
            Ok(())
        }

        GroupsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete group {id}?"), global.yes)? {
                return Ok(());
            }
            console.groups().remove(id).await?;
            util::ack(&format!("Group {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
