use futures::stream;

use crate::pipeline::{Envelope, InputStream, Source};

/// Non-interactive source: a fixed list of commands, e.g. from argv.
#[derive(Debug, Clone, Default)]
pub struct ArgsSource {
    commands: Vec<String>,
}

impl ArgsSource {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[async_trait::async_trait]
impl Source<String> for ArgsSource {
    async fn stream(&self) -> InputStream<String> {
        let items: Vec<_> = self.commands.iter().cloned().map(|c| Ok(Envelope::new(c))).collect();
        Box::pin(stream::iter(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn yields_commands_in_order() {
        let source = ArgsSource::new(["role officer", "table"]);
        let lines: Vec<String> = source
            .stream()
            .await
            .map(|item| item.unwrap().payload)
            .collect()
            .await;
        assert_eq!(lines, ["role officer", "table"]);
    }
}
