//! Terminal prompter.
//!
//! Dialogs become numbered choices on stdout with the selection read from
//! stdin. Stateless per call, like the host dialog seam it implements.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use share_core::host::{DialogButton, HostError, Prompter, Result};

pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn choose(&self, message: &str, buttons: &[DialogButton]) -> Result<String> {
        println!("{message}");
        for (index, button) in buttons.iter().enumerate() {
            let label = if button.title.is_empty() {
                &button.id
            } else {
                &button.title
            };
            println!("  {}) {label}", index + 1);
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            let _ = std::io::stdout().flush();

            let line = lines
                .next_line()
                .await
                .map_err(|err| HostError::Dialog(err.to_string()))?
                .ok_or_else(|| HostError::Dialog("stdin closed".to_string()))?;

            match line.trim().parse::<usize>() {
                Ok(choice) if (1..=buttons.len()).contains(&choice) => {
                    return Ok(buttons[choice - 1].id.clone());
                }
                _ => println!("pick a number between 1 and {}", buttons.len()),
            }
        }
    }

    async fn notify(&self, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }
}
