use std::future::Future;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::icons::{CHECK, CROSS};

/// Loading indicator shown on stderr while a request is outstanding.
///
/// Hidden automatically when stderr is not a terminal, so piped output and
/// tests stay clean.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn success(self, message: impl AsRef<str>) {
        self.bar
            .finish_with_message(format!("{}{}", CHECK, style(message.as_ref()).green()));
    }

    pub fn failure(self, message: impl AsRef<str>) {
        self.bar
            .finish_with_message(format!("{}{}", CROSS, style(message.as_ref()).red()));
    }

    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}

/// Await `work` behind a spinner that disappears when it resolves.
pub async fn with_spinner<F, T>(message: &str, work: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = Spinner::start(message);
    let result = work.await;
    spinner.clear();
    result
}
