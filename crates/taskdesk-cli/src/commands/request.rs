//! Raw request through the full client pipeline

use crate::{
    cli::OutputFormat,
    error::CliResult,
    utils::{parse_json_arg, ColoredOutput},
};
use taskdesk_client::{ApiClient, RequestDescriptor};
use tracing::debug;

pub struct RequestCommand;

impl RequestCommand {
    pub async fn run(
        client: &ApiClient,
        method: &str,
        path: &str,
        data: Option<String>,
        format: OutputFormat,
    ) -> CliResult<()> {
        let mut request = RequestDescriptor::new(method.to_ascii_uppercase(), path);
        if let Some(data) = data {
            request = request.with_body(parse_json_arg(&data)?);
        }
        debug!(method = %request.method, path = %request.path, "Running raw request");

        let response = client.execute(request).await?;

        if format != OutputFormat::Json {
            eprintln!(
                "{} {}",
                ColoredOutput::highlight(&format!("HTTP {}", response.status)),
                ColoredOutput::dim(path)
            );
        }
        println!("{}", format.format_json(&response.body)?);
        Ok(())
    }
}
