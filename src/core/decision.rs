use chrono::NaiveDate;
use enumset::EnumSet;

use crate::{
    core::{
        account::{fetch_account_state, fetch_consumption, fetch_tariff_rates},
        calculator::total_cost,
        consumption::billed_cost,
        provider::Provider,
        tariff::Tariff,
    },
    notifier::Notifier,
    prelude::*,
    quantity::cost::Cost,
};

/// Outcome of comparing today's consumption across the candidate tariffs.
#[derive(Clone, Debug)]
pub struct Decision {
    pub current_tariff: Tariff,
    pub current_total: Cost,
    pub best_tariff: Tariff,
    pub best_total: Cost,

    /// Day totals in comparison order, the current tariff first.
    pub totals: Vec<(Tariff, Cost)>,
}

impl Decision {
    pub fn should_switch(&self) -> bool {
        self.best_tariff != self.current_tariff
    }

    pub fn summary(&self) -> String {
        format!(
            "Best potential cost on {}: {} vs your current cost on {}: {}",
            self.best_tariff, self.best_total, self.current_tariff, self.current_total,
        )
    }
}

/// Pick the strictly cheapest tariff, keeping the current one on a tie.
pub fn select_best(
    current: (Tariff, Cost),
    candidates: impl IntoIterator<Item = (Tariff, Cost)>,
) -> (Tariff, Cost) {
    candidates.into_iter().fold(current, |best, candidate| {
        if candidate.1 < best.1 { candidate } else { best }
    })
}

/// Compare what today would have cost on every candidate tariff.
///
/// The current tariff is priced from the readings' own billed costs. Every failure aborts the
/// comparison as a whole.
#[instrument(skip_all, fields(today = ?today))]
pub async fn compare(
    provider: &dyn Provider,
    notifier: &Notifier,
    candidates: EnumSet<Tariff>,
    today: NaiveDate,
) -> Result<Decision> {
    let state = fetch_account_state(provider, candidates).await?;
    let readings = fetch_consumption(provider, &state.device_id, today).await?;

    let current_total = billed_cost(&readings) + state.standing_charge;
    notifier.notify(&format!("Current cost on {}: {current_total}", state.current_tariff)).await;

    let mut potential_totals = Vec::with_capacity(candidates.len());
    for tariff in candidates.iter().filter(|tariff| *tariff != state.current_tariff) {
        let rates = fetch_tariff_rates(provider, tariff, state.region_code, today).await?;
        let total = total_cost(&readings, &rates)
            .with_context(|| format!("failed to price today's consumption on {tariff}"))?;
        notifier.notify(&format!("Potential cost on {tariff}: {total}")).await;
        potential_totals.push((tariff, total));
    }

    let (best_tariff, best_total) =
        select_best((state.current_tariff, current_total), potential_totals.iter().copied());
    info!(%best_tariff, ?best_total, "compared");

    let mut totals = Vec::with_capacity(potential_totals.len() + 1);
    totals.push((state.current_tariff, current_total));
    totals.extend(potential_totals);
    Ok(Decision {
        current_tariff: state.current_tariff,
        current_total,
        best_tariff,
        best_total,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::{
        core::fake::{FakeProvider, day},
        error::HopperError,
        notifier::tests::RecordingChannel,
    };

    #[test]
    fn select_strictly_cheaper() {
        let best = select_best(
            (Tariff::Agile, Cost::from(150.0)),
            [(Tariff::Go, Cost::from(120.0)), (Tariff::Cosy, Cost::from(180.0))],
        );
        assert_eq!(best, (Tariff::Go, Cost::from(120.0)));
    }

    #[test]
    fn tie_keeps_current_in_any_order() {
        let candidates = [(Tariff::Go, Cost::from(150.0)), (Tariff::Cosy, Cost::from(150.0))];
        for permutation in candidates.iter().copied().permutations(2) {
            let best = select_best((Tariff::Agile, Cost::from(150.0)), permutation);
            assert_eq!(best.0, Tariff::Agile);
        }
    }

    #[tokio::test]
    async fn scenario_cheaper_candidate_is_selected() -> Result {
        let provider = FakeProvider::with_totals(Tariff::Agile, 150.0, &[(Tariff::Go, 120.0), (Tariff::Cosy, 180.0)]);
        let channel = RecordingChannel::default();
        let notifier = Notifier::default().with_channel(channel.clone());

        let decision = compare(&provider, &notifier, EnumSet::all(), day()).await?;

        assert!(decision.should_switch());
        assert_eq!(decision.best_tariff, Tariff::Go);
        assert_eq!(decision.best_total, Cost::from(120.0));
        assert_eq!(decision.current_total, Cost::from(150.0));
        assert_eq!(
            decision.totals.iter().map(|(tariff, _)| *tariff).collect_vec(),
            [Tariff::Agile, Tariff::Go, Tariff::Cosy],
        );
        assert_eq!(
            channel.messages(),
            [
                "Current cost on AGILE: £1.50",
                "Potential cost on GO: £1.20",
                "Potential cost on COSY: £1.80",
            ],
        );
        Ok(())
    }

    #[tokio::test]
    async fn scenario_all_equal_keeps_current() -> Result {
        let provider = FakeProvider::with_totals(Tariff::Agile, 150.0, &[(Tariff::Go, 150.0), (Tariff::Cosy, 150.0)]);
        let decision = compare(&provider, &Notifier::default(), EnumSet::all(), day()).await?;
        assert!(!decision.should_switch());
        assert_eq!(decision.best_tariff, Tariff::Agile);
        Ok(())
    }

    #[tokio::test]
    async fn current_tariff_is_not_repriced() -> Result {
        let provider = FakeProvider::with_totals(Tariff::Go, 100.0, &[(Tariff::Agile, 90.0), (Tariff::Cosy, 95.0)]);
        let decision = compare(&provider, &Notifier::default(), EnumSet::all(), day()).await?;
        assert_eq!(decision.best_tariff, Tariff::Agile);
        assert!(!provider.calls().iter().any(|call| call.starts_with("get_unit_rates E-1R-GO")));
        Ok(())
    }

    #[tokio::test]
    async fn scenario_gap_in_rates_aborts() {
        let mut provider = FakeProvider::with_totals(Tariff::Agile, 150.0, &[(Tariff::Go, 120.0), (Tariff::Cosy, 180.0)]);
        provider.punch_gap(Tariff::Go);
        let error = compare(&provider, &Notifier::default(), EnumSet::all(), day()).await.unwrap_err();
        assert!(matches!(error.downcast_ref::<HopperError>(), Some(HopperError::Lookup(_))));
    }

    #[tokio::test]
    async fn missing_product_is_data_error() {
        let mut provider = FakeProvider::with_totals(Tariff::Agile, 150.0, &[(Tariff::Go, 120.0)]);
        provider.products.retain(|product| product.display_name != "Octopus Go");
        let error = compare(&provider, &Notifier::default(), Tariff::Agile | Tariff::Go, day())
            .await
            .unwrap_err();
        assert!(matches!(error.downcast_ref::<HopperError>(), Some(HopperError::Data(_))));
    }

    #[test]
    fn summary_message() {
        let decision = Decision {
            current_tariff: Tariff::Agile,
            current_total: Cost::from(150.0),
            best_tariff: Tariff::Go,
            best_total: Cost::from(120.0),
            totals: Vec::new(),
        };
        assert_eq!(
            decision.summary(),
            "Best potential cost on GO: £1.20 vs your current cost on AGILE: £1.50",
        );
    }
}
