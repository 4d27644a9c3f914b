use async_stream::try_stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::pipeline::{Envelope, InputStream, PipelineError, Source};

/// Interactive source: one command per line of standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

#[async_trait::async_trait]
impl Source<String> for StdinSource {
    async fn stream(&self) -> InputStream<String> {
        let s = try_stream! {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();

            while let Some(line) = lines.next_line().await.map_err(|e| {
                PipelineError::Source(format!("failed to read stdin line: {e}"))
            })? {
                yield Envelope::new(line);
            }
        };

        Box::pin(s)
    }
}
