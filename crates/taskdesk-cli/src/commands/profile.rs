use crate::{
    cli::{OutputFormat, ProfileCommand},
    error::CliResult,
    utils::ColoredOutput,
};
use taskdesk_client::services::{ProfileUpdate, UserService};
use taskdesk_client::ApiClient;

pub struct ProfileCommandRunner;

impl ProfileCommandRunner {
    pub async fn run(client: ApiClient, action: ProfileCommand) -> CliResult<()> {
        let service = UserService::new(client);

        match action {
            ProfileCommand::Show { format } => {
                let body = service.get_profile().await?;
                if format == OutputFormat::Table {
                    match UserService::profile_from_body(&body) {
                        Some(profile) => {
                            println!("{}", ColoredOutput::highlight(&profile.display_name()));
                            if let Some(email) = profile.email {
                                println!("{}", ColoredOutput::dim(&email));
                            }
                        }
                        None => println!("{}", format.format_json(&body)?),
                    }
                } else {
                    println!("{}", format.format_json(&body)?);
                }
            }
            ProfileCommand::Update {
                first_name,
                last_name,
            } => {
                let body = service
                    .update_profile(&ProfileUpdate {
                        first_name,
                        last_name,
                    })
                    .await?;
                let message = body
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Profile updated");
                println!("{}", ColoredOutput::success(message));
            }
        }

        Ok(())
    }
}
