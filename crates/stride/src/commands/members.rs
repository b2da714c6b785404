//! Member command handlers.

use tabled::Tabled;

use stride_core::{Console, UserInfo, UserStatus};

use crate::cli::{GlobalOpts, MembersArgs, MembersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "Nickname")]
    nickname: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Group")]
    group: String,
}

fn to_row(m: &UserInfo, color: bool) -> MemberRow {
    MemberRow {
        id: m.id.map(|id| id.to_string()).unwrap_or_default(),
        login: m.login.clone(),
        nickname: m.nickname.clone().unwrap_or_default(),
        email: m.email.clone().unwrap_or_default(),
        status: output::status_accent(&m.status.to_string(), m.status.is_active(), color),
        group: m.group_id.map(|id| id.to_string()).unwrap_or_default(),
    }
}

fn detail(m: &UserInfo) -> String {
    [
        format!("ID:       {}", m.id.map(|id| id.to_string()).unwrap_or_default()),
        format!("Login:    {}", m.login),
        format!("Nickname: {}", m.nickname.as_deref().unwrap_or("-")),
        format!("Email:    {}", m.email.as_deref().unwrap_or("-")),
        format!("Status:   {}", m.status),
        format!(
            "Group:    {}",
            m.group_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!(
            "Joined:   {}",
            m.joined_date
                .map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d").to_string())
        ),
    ]
    .join("\n")
}

fn plain_id(m: &UserInfo) -> String {
    m.id.map(|id| id.to_string()).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: MembersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        MembersCommand::List(list) => {
            let query = util::page_query(console, &list);
            console.members().fetch_list(&query).await?;
            let state = console.members().state();

            let out = output::render_list(
                &global.output,
                &state.entities,
                |m| to_row(m, color),
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

        MembersCommand::Get { id } => {
            console.members().fetch_one(id).await?;
            let member =
                util::take_entity(console.members().state(), "member", id, "members list")?;
            let out = output::render_single(&global.output, &member, detail, plain_id);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MembersCommand::Create {
            login,
            nickname,
            email,
            group,
        } => {
            let draft = UserInfo {
                id: None,
                login,
                nickname,
                email,
                status: UserStatus::Active,
                group_id: group,
                joined_date: None,
            };
            console.members().create(draft).await?;
            let created = console.members().state().entity;
            let id = created.as_ref().and_then(|m| m.id).unwrap_or_default();
            util::ack(&format!("Member {id} created"), global.quiet);
            Ok(())
        }

        MembersCommand::Update {
            id,
            login,
            nickname,
            email,
            group,
        } => {
            console.members().fetch_one(id).await?;
            let mut member =
                util::take_entity(console.members().state(), "member", id, "members list")?;

            if let Some(login) = login {
                member.login = login;
            }
            if let Some(nickname) = nickname {
                member.nickname = Some(nickname);
            }
            if let Some(email) = email {
                member.email = Some(email);
            }
            if let Some(group) = group {
                member.group_id = Some(group);
            }

            console.members().update(member).await?;
            util::ack(&format!("Member {id} updated"), global.quiet);
            Ok(())
        }

        MembersCommand::Freeze { id } => set_status(console, global, id, UserStatus::Frozen).await,

        MembersCommand::Activate { id } => {
            set_status(console, global, id, UserStatus::Active).await
        }

        MembersCommand::Delete { id } => {
            if !util::confirm(&format!("Delete member {id}?"), global.yes)? {
                return Ok(());
            }
            console.members().remove(id).await?;
            util::ack(&format!("Member {id} deleted"), global.quiet);
            Ok(())
        }
    }
}

/// Freeze/activate are status flips expressed through UPDATE; both
/// confirm first, like the delete path.
async fn set_status(
    console: &Console,
    global: &GlobalOpts,
    id: i64,
    status: UserStatus,
) -> Result<(), CliError> {
    let verb = match status {
        UserStatus::Frozen => "Freeze",
        UserStatus::Active => "Activate",
    };
    if !util::confirm(&format!("{verb} member {id}?"), global.yes)? {
        return Ok(());
    }

    console.members().fetch_one(id).await?;
    let mut member = util::take_entity(console.members().state(), "member", id, "members list")?;
    member.status = status;
    console.members().update(member).await?;
    util::ack(&format!("Member {id} is now {status}"), global.quiet);
    Ok(())
}
