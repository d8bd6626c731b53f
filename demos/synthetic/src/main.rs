//! synthetic — end-to-end run of the mobility validation pipeline on a
//! generated city.
//!
//! 1. Generate a 6 × 6 zone grid and four weeks of labelled observations.
//! 2. Filter the population and turn the observations into a ground-truth
//!    ODM (the observed-visit baseline).
//! 3. Fit the preferential-return model per user and simulate two weeks,
//!    streaming visits to `visits.csv`.
//! 4. Build the model ODM, a gravity-model ODM, and score both against the
//!    ground truth (KL divergence per distance quantile, SpSSIM).
//! 5. Write the metric tables and a JSON run record.
//!
//! Output goes to `output/synthetic/`.  Set `MV_LOG_DEBUG=1` for debug-level
//! logs (IPF convergence, gaps over the time threshold).

mod city;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, Level};

use mv_core::{GeoPoint, SimRng};
use mv_model::{DailyTrips, ModelConfigBuilder, Population, PopulationFilter, RegionSampling};
use mv_odm::{GravityModel, OdmBuilder};
use mv_output::{
    read_odm, read_visits, write_json, write_metrics, write_odm, write_spssim, CsvVisitWriter, RunRecord,
    DivergenceScore, VisitOutputObserver,
};
use mv_sim::SamplerBuilder;
use mv_spatial::{DistanceQuantiles, ZoneDistances};
use mv_validate::{kullback_leibler, spssim, DistanceMetrics, DEFAULT_SPSSIM_QUANTILES};

use city::City;

// ── Constants ─────────────────────────────────────────────────────────────────

const USERS:      u64   = 400;
const SEED:       u64   = 42;
const N_DAYS:     u32   = 14;
const P:          f64   = 0.98;
const GAMMA:      f64   = 0.18;
const QUANTILES:  usize = 100;
/// Observed consecutive visits further apart than this are not trips.
const MAX_GAP_SECS: i64 = 12 * 3_600;

const OUTPUT_DIR: &str = "output/synthetic";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let level = if std::env::var_os("MV_LOG_DEBUG").is_some() { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let out = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out).with_context(|| format!("creating {OUTPUT_DIR}"))?;

    // 1. City and population.
    let city = City::new(GeoPoint::new(59.33, 18.06))?;
    let mut rng = SimRng::new(SEED);
    let observations = city.observations(USERS, &mut rng);
    let population = PopulationFilter::default().apply(Population::from_observations(observations));
    info!(zones = city.zones.len(), users = population.len(), "synthetic city ready");

    // 2. Ground truth from the observed visits, round-tripped through CSV.
    let distances = ZoneDistances::from_zones(&city.zones);
    let odm_builder = OdmBuilder::new(&city.zones, city.plane).time_threshold(MAX_GAP_SECS);
    let observed = odm_builder.build(&population.to_visits()).context("ground-truth ODM")?;
    let gt_path = out.join("odm_groundtruth.csv");
    write_odm(&gt_path, &city.zones, &observed)?;
    let ground_truth = read_odm(&gt_path, &city.zones)?;

    // 3. Simulate.
    let model = ModelConfigBuilder::new()
        .p(P)
        .gamma(GAMMA)
        .region_sampling(RegionSampling::transition_zipf())
        .build()?;
    let sampler = SamplerBuilder::new(model)
        .daily_trips(DailyTrips::national_travel_survey())
        .n_days(N_DAYS)
        .seed(SEED)
        .build()?;

    let t0 = Instant::now();
    let mut obs = VisitOutputObserver::new(CsvVisitWriter::new(out)?);
    let summary = sampler.run(&population, &mut obs)?;
    if let Some(e) = obs.take_error() {
        return Err(e).context("writing visits");
    }
    info!(
        users = summary.users,
        visits = summary.visits,
        explorations = summary.explorations,
        secs = t0.elapsed().as_secs_f64(),
        "simulation complete"
    );

    // 4. Model and gravity ODMs.
    let visits = read_visits(&out.join("visits.csv"))?;
    let model_odm = OdmBuilder::new(&city.zones, city.plane).build(&visits).context("model ODM")?;
    write_odm(&out.join("odm_model.csv"), &city.zones, &model_odm)?;
    let gravity_odm = GravityModel::default().gravitate(&model_odm, &distances)?;

    // 5. Scores.
    let quantiles = DistanceQuantiles::new(&distances, QUANTILES)?;
    let table = DistanceMetrics::compute(
        &quantiles,
        &[&ground_truth, &model_odm, &gravity_odm],
        &["groundtruth", "model", "gravity"],
    )?;
    write_metrics(&out.join("distance-metrics.csv"), &table)?;

    let coarse = DistanceQuantiles::new(&distances, DEFAULT_SPSSIM_QUANTILES)?;
    let mut record = RunRecord::new(sampler.config().clone(), &summary);
    for (title, odm) in [("model", &model_odm), ("gravity", &gravity_odm)] {
        let kl = kullback_leibler(&table, "groundtruth", title)?;
        let report = spssim(&ground_truth, odm, &coarse)?;
        write_spssim(&out.join(format!("spssim-{title}.csv")), &report)?;
        info!(
            title,
            bins = table.len(),
            kl,
            spssim = report.mean_score,
            spssim_weighted = report.weighted_score,
            "divergence"
        );
        record.scores.push(DivergenceScore {
            scale:           "grid".to_owned(),
            odm:             title.to_owned(),
            kl,
            spssim_mean:     Some(report.mean_score),
            spssim_weighted: Some(report.weighted_score),
        });
    }
    write_json(&out.join("parameters.json"), &record)?;

    println!();
    println!("{:<10} {:>10} {:>10} {:>10}", "ODM", "KL", "SpSSIM", "weighted");
    println!("{}", "-".repeat(43));
    for s in &record.scores {
        println!(
            "{:<10} {:>10.4} {:>10.4} {:>10.4}",
            s.odm,
            s.kl,
            s.spssim_mean.unwrap_or(f64::NAN),
            s.spssim_weighted.unwrap_or(f64::NAN),
        );
    }
    println!();
    println!("Output written to {OUTPUT_DIR}/");
    Ok(())
}
