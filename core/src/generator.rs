//! Deterministic synthetic corpus.
//!
//! Stands in for the bulk loader when no record file is supplied.
//! Distributions:
//!   - month uniform over 1–12, day uniform over 1–28 (every month has it)
//!   - status, channel, device, client type and geography uniform
//!   - price uniform over 15–99, doubled with probability 0.3
//!   - actions only on recovered carts, uniform over the four actions or none

use crate::{
    config::CorpusConfig,
    error::{DashError, DashResult},
    record::{AcquisitionChannel, CartStatus, ClientType, DeviceType, MarketingAction, Record},
    rng::CorpusRng,
    types::Month,
};

const DOUBLE_PRICE_PROBABILITY: f64 = 0.3;

pub struct CorpusGenerator;

impl CorpusGenerator {
    pub fn generate(config: &CorpusConfig) -> DashResult<Vec<Record>> {
        if config.products.is_empty() || config.cities.is_empty() || config.countries.is_empty() {
            return Err(DashError::InvalidConfig(
                "corpus catalog lists must not be empty".into(),
            ));
        }

        let mut rng = CorpusRng::new(config.seed);
        let records: Vec<Record> = (1..=config.record_count)
            .map(|i| Self::generate_record(&mut rng, config, i))
            .collect();

        log::info!(
            "generator: {} records for {} (seed={})",
            records.len(),
            config.year,
            config.seed,
        );
        Ok(records)
    }

    fn generate_record(rng: &mut CorpusRng, config: &CorpusConfig, index: usize) -> Record {
        let month = rng.between(1, 12) as Month;
        let day = rng.between(1, 28) as u8;
        let status = *rng.pick(&CartStatus::ALL);

        let mut price = rng.between(15, 99) as f64;
        if rng.chance(DOUBLE_PRICE_PROBABILITY) {
            price *= 2.0;
        }

        let actions = if status == CartStatus::Recovered {
            Self::pick_action(rng)
        } else {
            None
        };

        Record {
            order_number:        format!("ORD-{index:04}"),
            product:             rng.pick(&config.products).clone(),
            client:              format!("client{index}@example.com"),
            country:             rng.pick(&config.countries).clone(),
            city:                rng.pick(&config.cities).clone(),
            price,
            status,
            actions,
            acquisition_channel: *rng.pick(&AcquisitionChannel::ALL),
            device_type:         *rng.pick(&DeviceType::ALL),
            client_type:         *rng.pick(&ClientType::ALL),
            year:                config.year,
            month,
            day,
            hour:                format!("{:02}:{:02}", rng.next_u64_below(24), rng.next_u64_below(60)),
        }
    }

    /// One slot per action plus one for "no action".
    fn pick_action(rng: &mut CorpusRng) -> Option<MarketingAction> {
        let slot = rng.next_u64_below(MarketingAction::ALL.len() as u64 + 1) as usize;
        MarketingAction::ALL.get(slot).copied()
    }
}
