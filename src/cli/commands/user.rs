use anyhow::bail;
use clap::Subcommand;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::models::{Role, User};
use crate::database::store::{document_id, Document};
use crate::database::{open_store, Repository};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create an admin account")]
    Create {
        #[arg(help = "Login name")]
        username: String,
        #[arg(long, value_enum, default_value = "staff", help = "Account role")]
        role: Role,
        #[arg(long, help = "Organization shown on the account")]
        organization: Option<String>,
        #[arg(long, env = "MUSEUM_USER_PASSWORD", help = "Initial password")]
        password: String,
    },

    #[command(about = "Print the bcrypt hash of a password")]
    HashPassword {
        #[arg(help = "Password to hash")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create {
            username,
            role,
            organization,
            password,
        } => {
            let users = Repository::<User>::new(open_store(&config().database)?);

            let mut filter = Document::new();
            filter.insert("username".to_string(), json!(username));
            if users.find_one(&filter).await?.is_some() {
                bail!("User '{}' already exists", username);
            }

            let user = User {
                username,
                password: hash_password(&password)?,
                role,
                organization,
            };
            let saved = users.insert(&user).await?;

            output_success(
                &output_format,
                &format!("Created {} user '{}'", user.role, user.username),
                Some(json!({
                    "id": document_id(&saved),
                    "username": user.username,
                    "role": user.role,
                })),
            )
        }
        UserCommands::HashPassword { password } => {
            output_value(&output_format, "hash", &hash_password(&password)?)
        }
    }
}
