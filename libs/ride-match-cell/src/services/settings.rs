// libs/ride-match-cell/src/services/settings.rs
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use shared_database::RecordStore;

use crate::models::MatchWindow;

pub const DEFAULT_PRIOR_PERIOD_SECS: i64 = 1800;
pub const DEFAULT_SUBSEQUENT_PERIOD_SECS: i64 = -900;

/// Resolves the two tunable matching-window parameters from the settings
/// table, at most once per reconciliation run. Stored values are minutes;
/// `subsequent_period` is negated because the window extends before the
/// drop-off. An absent row is normal and falls back to the defaults.
pub struct MatchSettings {
    store: Arc<dyn RecordStore>,
    window: OnceCell<MatchWindow>,
}

impl MatchSettings {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            window: OnceCell::new(),
        }
    }

    pub async fn window(&self) -> Result<MatchWindow> {
        let window = self
            .window
            .get_or_try_init(|| async {
                let prior_period = self
                    .resolve_minutes("prior_period")
                    .await?
                    .map(|minutes| minutes * 60)
                    .unwrap_or(DEFAULT_PRIOR_PERIOD_SECS);
                let subsequent_period = self
                    .resolve_minutes("subsequent_period")
                    .await?
                    .map(|minutes| minutes * -60)
                    .unwrap_or(DEFAULT_SUBSEQUENT_PERIOD_SECS);
                debug!(
                    "Resolved match window: prior_period={}s subsequent_period={}s",
                    prior_period, subsequent_period
                );
                Ok::<_, anyhow::Error>(MatchWindow {
                    prior_period,
                    subsequent_period,
                })
            })
            .await?;
        Ok(*window)
    }

    async fn resolve_minutes(&self, name: &str) -> Result<Option<i64>> {
        let Some(setting) = self.store.get_setting(name).await? else {
            debug!("Setting '{}' absent, using default", name);
            return Ok(None);
        };
        match setting.value.trim().parse::<i64>() {
            Ok(minutes) => Ok(Some(minutes)),
            Err(_) => {
                warn!(
                    "Setting '{}' has non-numeric value '{}', using default",
                    name, setting.value
                );
                Ok(None)
            }
        }
    }
}
