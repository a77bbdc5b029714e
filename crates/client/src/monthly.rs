//! The admin monthly-distribution screen, minus the rendering.
//!
//! [`MonthlyView`] owns everything the screen shows: the selected period,
//! the editable inputs, the load lifecycle, and the derived distribution
//! figures. The derivation itself lives in `taskpoints_core::distribution`
//! so the numbers here always agree with what the server persists.

use taskpoints_core::distribution::{
    self, DerivedDistribution, DEFAULT_PROFIT_PERCENTAGE,
};

use crate::error::ClientError;
use crate::http::ApiClient;
use crate::types::{MonthlySetting, SaveMonthlySettings};

/// Load lifecycle of the monthly screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch attempted for the current period yet.
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// Server data applied (or defaults, when the period has no setting).
    Loaded,
    /// The fetch failed. Inputs keep their last values and the screen
    /// stays usable; `load` may be called again.
    LoadFailed(String),
}

/// State backing the monthly settings & salary screen.
pub struct MonthlyView {
    client: ApiClient,
    year: i32,
    month: u32,
    state: LoadState,
    /// Editable inputs. `None` means the field is blank, not zero.
    total_profit: Option<f64>,
    profit_percentage: Option<f64>,
    /// Total earned points for the period, from the server.
    total_points: i64,
    /// The persisted setting as last fetched, for finalized-lock display.
    setting: Option<MonthlySetting>,
}

impl MonthlyView {
    pub fn new(client: ApiClient, year: i32, month: u32) -> Self {
        Self {
            client,
            year,
            month,
            state: LoadState::Unloaded,
            total_profit: None,
            profit_percentage: Some(DEFAULT_PROFIT_PERCENTAGE),
            total_points: 0,
            setting: None,
        }
    }

    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// The persisted setting as of the last successful load or save.
    pub fn setting(&self) -> Option<&MonthlySetting> {
        self.setting.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        self.setting.as_ref().is_some_and(|s| s.is_finalized)
    }

    /// Switch to another period. Previous data no longer applies, so the
    /// view goes back to [`LoadState::Unloaded`] until the next `load`.
    pub fn select_period(&mut self, year: i32, month: u32) {
        self.year = year;
        self.month = month;
        self.state = LoadState::Unloaded;
        self.total_profit = None;
        self.profit_percentage = Some(DEFAULT_PROFIT_PERCENTAGE);
        self.total_points = 0;
        self.setting = None;
    }

    /// Field setters. Out-of-range values are accepted here and surfaced at
    /// save time; the screen renders whatever was typed in the meantime.
    pub fn set_total_profit(&mut self, value: Option<f64>) {
        self.total_profit = value;
    }

    pub fn set_profit_percentage(&mut self, value: Option<f64>) {
        self.profit_percentage = value;
    }

    pub fn total_profit(&self) -> Option<f64> {
        self.total_profit
    }

    pub fn profit_percentage(&self) -> Option<f64> {
        self.profit_percentage
    }

    /// The live distribution figures. Blank fields count as zero, so these
    /// are always renderable regardless of load state.
    pub fn derived(&self) -> DerivedDistribution {
        distribution::recompute_partial(
            self.total_profit,
            self.profit_percentage,
            Some(self.total_points),
        )
    }

    /// Fetch the period's setting and point total, then apply both.
    ///
    /// On failure the inputs are left untouched and the state records the
    /// error; the caller may retry with another `load`.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.state = LoadState::Loading;

        let fetched = self.fetch().await;
        match fetched {
            Ok((setting, total_points)) => {
                self.total_points = total_points;
                match &setting {
                    Some(s) => {
                        self.total_profit = Some(s.total_profit);
                        self.profit_percentage = Some(s.profit_percentage);
                    }
                    None => {
                        // Never-saved period: blank profit, default cut.
                        self.total_profit = None;
                        self.profit_percentage = Some(DEFAULT_PROFIT_PERCENTAGE);
                    }
                }
                self.setting = setting;
                self.state = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::LoadFailed(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<(Option<MonthlySetting>, i64), ClientError> {
        let setting = self.client.monthly_settings(self.year, self.month).await?;
        let total_points = self.client.monthly_total_points(self.year, self.month).await?;
        Ok((setting, total_points))
    }

    /// Validate the inputs locally, persist them, and re-fetch.
    ///
    /// Validation failures never reach the network; they come back as
    /// [`ClientError::Validation`] with the field named in the message.
    pub async fn save(&mut self) -> Result<(), ClientError> {
        let total_profit = self
            .total_profit
            .ok_or_else(|| ClientError::Validation("total_profit is required".into()))?;
        let profit_percentage = self
            .profit_percentage
            .ok_or_else(|| ClientError::Validation("profit_percentage is required".into()))?;

        distribution::validate_setting(self.month, total_profit, profit_percentage)
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        let saved = self
            .client
            .save_monthly_settings(&SaveMonthlySettings {
                year: self.year,
                month: self.month as i32,
                total_profit,
                profit_percentage,
            })
            .await?;
        self.setting = Some(saved);

        // Re-fetch so derived figures reflect exactly what was persisted.
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::session::SessionStore;

    fn offline_view() -> MonthlyView {
        // Points at nothing routable; used only for logic that must not
        // touch the network.
        let client = ApiClient::new("http://127.0.0.1:9", Arc::new(SessionStore::in_memory()));
        MonthlyView::new(client, 2026, 3)
    }

    #[test]
    fn test_new_view_defaults() {
        let view = offline_view();
        assert_eq!(*view.state(), LoadState::Unloaded);
        assert_eq!(view.total_profit(), None);
        assert_eq!(view.profit_percentage(), Some(25.0));
        assert_eq!(view.period(), (2026, 3));
    }

    #[test]
    fn test_derived_with_blank_fields_is_zero() {
        let mut view = offline_view();
        view.set_profit_percentage(None);
        let d = view.derived();
        assert_eq!(d.distribution_amount, 0.0);
        assert_eq!(d.point_value, 0.0);
    }

    #[test]
    fn test_select_period_resets_state() {
        let mut view = offline_view();
        view.set_total_profit(Some(10_000.0));
        view.set_profit_percentage(Some(40.0));

        view.select_period(2026, 4);
        assert_eq!(view.period(), (2026, 4));
        assert_eq!(*view.state(), LoadState::Unloaded);
        assert_eq!(view.total_profit(), None);
        assert_eq!(view.profit_percentage(), Some(25.0));
    }

    #[tokio::test]
    async fn test_save_rejects_bad_percentage_without_network() {
        let mut view = offline_view();
        view.set_total_profit(Some(10_000.0));
        view.set_profit_percentage(Some(150.0));

        // The client points at a dead address; a Validation error (not a
        // Network one) proves the request was blocked locally.
        let err = view.save().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "got {err:?}");

        view.set_profit_percentage(Some(-5.0));
        let err = view.save().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_save_requires_profit() {
        let mut view = offline_view();
        let err = view.save().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref m) if m.contains("total_profit")));
    }
}
