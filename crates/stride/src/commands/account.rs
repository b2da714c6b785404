//! Signed-in account command handlers.

use stride_core::{Account, Console};

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(a: &Account) -> String {
    [
        format!("Login:       {}", a.login),
        format!("Name:        {}", a.display_name()),
        format!("Email:       {}", a.email.as_deref().unwrap_or("-")),
        format!("Language:    {}", a.lang_key.as_deref().unwrap_or("-")),
        format!("Activated:   {}", if a.activated { "yes" } else { "no" }),
        format!("Authorities: {}", a.authorities.join(", ")),
    ]
    .join("\n")
}

pub async fn handle(
    console: &Console,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Show => {
            console.account().load().await?;
            let state = console.account().state();
            let account = state.account.ok_or_else(|| CliError::ApiError {
                message: "server returned no account".into(),
            })?;
            let out =
                output::render_single(&global.output, &account, detail, |a| a.login.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountCommand::Update {
            first_name,
            last_name,
            email,
            lang,
        } => {
            console.account().load().await?;
            let mut account =
                console
                    .account()
                    .state()
                    .account
                    .ok_or_else(|| CliError::ApiError {
                        message: "server returned no account".into(),
                    })?;

            if let Some(first_name) = first_name {
                account.first_name = Some(first_name);
            }
            if let Some(last_name) = last_name {
                account.last_name = Some(last_name);
            }
            if let Some(email) = email {
                account.email = Some(email);
            }
            if let Some(lang) = lang {
                account.lang_key = Some(lang);
            }

            console.account().save(&account).await?;
            util::ack("Account updated", global.quiet);
            Ok(())
        }
    }
}
