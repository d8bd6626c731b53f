//! Integration tests for mv-sim.

use mv_core::{GeoPoint, Label, Observation, RegionId, UserId, Visit};
use mv_model::{ModelConfig, ModelConfigBuilder, Population};

use crate::{SampleObserver, SampleSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn obs(user: u64, t: i64, lat: f64, lon: f64, region: i64, label: Label) -> Observation {
    Observation {
        user:        UserId(user),
        tweet_id:    user * 1000 + t as u64,
        created_at:  1_600_000_000 + t * 3600,
        location:    GeoPoint::new(lat, lon),
        weekday:     3,
        hour_of_day: (t % 24) as u8,
        region:      RegionId(region),
        label,
    }
}

/// A user moving between home, work and a third place.
fn commuter(user: u64) -> Vec<Observation> {
    let base = user as f64 * 0.1;
    let home = (59.30 + base, 18.00);
    let work = (59.33 + base, 18.07);
    let park = (59.35 + base, 17.95);
    vec![
        obs(user, 0, home.0, home.1, 0, Label::Home),
        obs(user, 1, work.0, work.1, 1, Label::Work),
        obs(user, 2, home.0, home.1, 0, Label::Home),
        obs(user, 3, park.0, park.1, 2, Label::Other),
        obs(user, 4, work.0, work.1, 1, Label::Work),
        obs(user, 5, home.0, home.1, 0, Label::Home),
    ]
}

fn population(users: &[u64]) -> Population {
    users.iter().flat_map(|&u| commuter(u)).collect()
}

fn model() -> ModelConfig {
    ModelConfigBuilder::new().p(0.6).gamma(0.21).build().unwrap()
}

/// Records every callback for later inspection.
#[derive(Default)]
struct Recorder {
    started: Option<usize>,
    users:   Vec<(UserId, usize)>,
    summary: Option<SampleSummary>,
}

impl SampleObserver for Recorder {
    fn on_run_start(&mut self, users: usize) {
        self.started = Some(users);
    }

    fn on_user_end(&mut self, user: UserId, visits: &[Visit]) {
        self.users.push((user, visits.len()));
    }

    fn on_run_end(&mut self, summary: &SampleSummary) {
        self.summary = Some(*summary);
    }
}

// ── SamplerBuilder validation ─────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use mv_model::DailyTrips;

    use super::*;
    use crate::{SamplerBuilder, SimError};

    #[test]
    fn defaults() {
        let sampler = SamplerBuilder::new(model()).build().unwrap();
        assert_eq!(sampler.config().n_days, 1);
        assert_eq!(sampler.config().daily_trips, DailyTrips::Static { n: 4 });
    }

    #[test]
    fn zero_days_rejected() {
        assert!(matches!(SamplerBuilder::new(model()).n_days(0).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_model_rejected() {
        let mut bad = model();
        bad.p = 2.0;
        assert!(matches!(SamplerBuilder::new(bad).build(), Err(SimError::Model(_))));
    }

    #[test]
    fn invalid_daily_trips_rejected() {
        let result = SamplerBuilder::new(model())
            .daily_trips(DailyTrips::Normal { mean: 3.0, std: f64::NAN })
            .build();
        assert!(result.is_err());
    }
}

// ── Sampling ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sampling_tests {
    use mv_core::VisitKind;
    use mv_model::DailyTrips;

    use super::*;
    use crate::{NoopObserver, SamplerBuilder, SimError};

    #[test]
    fn home_only_when_no_trips() {
        // Two users whose only region is home; one day without trips.
        let pop: Population = [
            obs(1, 0, 59.3, 18.0, 0, Label::Home),
            obs(2, 0, 57.7, 11.9, 0, Label::Home),
        ]
        .into_iter()
        .collect();
        let sampler = SamplerBuilder::new(model())
            .daily_trips(DailyTrips::Static { n: 0 })
            .n_days(1)
            .build()
            .unwrap();

        let visits = sampler.sample(&pop).unwrap();
        assert_eq!(visits.len(), 2);
        for (v, (user, lat, lon)) in visits.iter().zip([(1, 59.3, 18.0), (2, 57.7, 11.9)]) {
            assert_eq!(v.user, UserId(user));
            assert_eq!((v.day, v.timeslot), (0, 0));
            assert_eq!(v.kind, VisitKind::Region);
            assert_eq!(v.location, GeoPoint::new(lat, lon));
        }
    }

    #[test]
    fn every_day_starts_at_home() {
        let pop = population(&[1, 2, 3]);
        let sampler = SamplerBuilder::new(model())
            .daily_trips(DailyTrips::Static { n: 3 })
            .n_days(5)
            .seed(9)
            .build()
            .unwrap();
        let visits = sampler.sample(&pop).unwrap();
        assert_eq!(visits.len(), 3 * 5 * 4);

        for user in [1, 2, 3] {
            let home = pop.get(UserId(user)).unwrap().home().unwrap().location;
            let mine: Vec<&Visit> = visits.iter().filter(|v| v.user == UserId(user)).collect();
            for day in 0..5 {
                let slots: Vec<u32> = mine.iter().filter(|v| v.day == day).map(|v| v.timeslot).collect();
                assert_eq!(slots, vec![0, 1, 2, 3]);
            }
            assert!(mine.iter().filter(|v| v.timeslot == 0).all(|v| v.location == home && v.region == RegionId(0)));
        }
    }

    #[test]
    fn output_is_chronological() {
        let pop = population(&[4, 1, 7]);
        let sampler = SamplerBuilder::new(model()).n_days(3).build().unwrap();
        let visits = sampler.sample(&pop).unwrap();
        assert!(visits.windows(2).all(|w| w[0].order_key() < w[1].order_key()));
    }

    #[test]
    fn deterministic_for_a_seed() {
        let pop = population(&[1, 2]);
        let build = |seed| SamplerBuilder::new(model()).n_days(10).seed(seed).build().unwrap();
        assert_eq!(build(5).sample(&pop).unwrap(), build(5).sample(&pop).unwrap());
    }

    #[test]
    fn user_independent_of_population() {
        let sampler = SamplerBuilder::new(model()).n_days(10).seed(5).build().unwrap();
        let alone = sampler.sample(&population(&[2])).unwrap();
        let together: Vec<Visit> = sampler
            .sample(&population(&[1, 2, 3]))
            .unwrap()
            .into_iter()
            .filter(|v| v.user == UserId(2))
            .collect();
        assert_eq!(alone, together);
    }

    #[test]
    fn zero_p_only_returns() {
        let cfg = ModelConfigBuilder::new().p(0.0).gamma(0.5).build().unwrap();
        let sampler = SamplerBuilder::new(cfg).n_days(20).build().unwrap();
        let visits = sampler.sample(&population(&[1])).unwrap();
        assert!(visits.iter().all(|v| v.kind == VisitKind::Region));
        assert!(visits.iter().all(|v| (0..=2).contains(&v.region.0)));
    }

    #[test]
    fn missing_home_names_user() {
        let mut rows = commuter(1);
        rows.iter_mut().for_each(|o| o.label = Label::Other);
        let pop: Population = rows.into_iter().collect();
        let err = SamplerBuilder::new(model()).build().unwrap().sample(&pop).unwrap_err();
        assert!(matches!(err, SimError::User { user: UserId(1), .. }), "{err}");
    }

    #[test]
    fn observer_sees_users_in_order() {
        let pop = population(&[3, 1, 2]);
        let sampler = SamplerBuilder::new(model())
            .daily_trips(DailyTrips::Static { n: 2 })
            .n_days(4)
            .build()
            .unwrap();

        let mut rec = Recorder::default();
        let summary = sampler.run(&pop, &mut rec).unwrap();

        assert_eq!(rec.started, Some(3));
        assert_eq!(rec.users, vec![(UserId(1), 12), (UserId(2), 12), (UserId(3), 12)]);
        assert_eq!(summary.users, 3);
        assert_eq!(summary.visits, 36);
        assert_eq!(rec.summary, Some(summary));

        let noop = sampler.run(&pop, &mut NoopObserver).unwrap();
        assert_eq!(noop, summary);
    }
}

// ── Config record ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use mv_model::DailyTrips;

    use super::*;
    use crate::{SamplerBuilder, SamplerConfig};

    #[test]
    fn json_roundtrip_rebuilds_sampler() {
        let mut config = SamplerConfig::new(model());
        config.daily_trips = DailyTrips::national_travel_survey();
        config.n_days = 140;
        config.seed = 42;

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["daily_trips_sampling"]["name"], "empirical");
        assert_eq!(json["n_days"], 140);
        assert_eq!(json["model"]["p"], 0.6);

        let back: SamplerConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
        assert!(SamplerBuilder::from_config(back).build().is_ok());
    }

    #[test]
    fn minimal_record() {
        let config: SamplerConfig = serde_json::from_str(r#"{"model": {"p": 0.5, "gamma": 0.2}}"#).unwrap();
        assert_eq!(config.n_days, 1);
        assert_eq!(config.daily_trips, DailyTrips::Static { n: 4 });
    }
}

// ── Rayon ─────────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use mv_model::DailyTrips;

    use super::*;
    use crate::SamplerBuilder;

    #[test]
    fn thread_pool_matches_user_by_user() {
        let users: Vec<u64> = (1..=40).collect();
        let pop = population(&users);
        let sampler = SamplerBuilder::new(model())
            .daily_trips(DailyTrips::Normal { mean: 3.0, std: 1.5 })
            .n_days(7)
            .seed(17)
            .build()
            .unwrap();

        let sequential: Vec<Visit> = pop.iter().flat_map(|h| sampler.sample_user(h).unwrap()).collect();

        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let pooled = pool.install(|| sampler.sample(&pop)).unwrap();
        assert_eq!(pooled, sequential);

        let mut rec = Recorder::default();
        pool.install(|| sampler.run(&pop, &mut rec)).unwrap();
        let order: Vec<UserId> = rec.users.iter().map(|(u, _)| *u).collect();
        assert_eq!(order, users.into_iter().map(UserId).collect::<Vec<_>>());
    }
}
