//! Training example: boost stump stages on a synthetic 1-D problem and
//! write the detector out as a hex-array artifact.

use gentleboost::{
    encode_binary, logging, rate_targets, to_hex_file, Cascade, Detector, GentleBoost,
    NormalizedRegion, RegressionTreeData, TrainConfig, TreeLearner,
};
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌲 GentleBoost - Cascade Training");
    println!("=================================\n");

    let config = TrainConfig::load_from_file("config/train.toml").unwrap_or_default();
    let num_stages = 3;
    let samples_per_class = 200;

    println!("Configuration:");
    println!("  Max rounds per stage: {}", config.max_rounds);
    println!("  Min true positive rate: {}", config.min_true_positive_rate);
    println!("  Max false positive rate: {}", config.max_false_positive_rate);
    println!("  Stages: {}", num_stages);
    println!();

    // Synthetic two-class data: positives above zero, negatives below,
    // with a sliver of overlap so later rounds have work to do.
    println!("📊 Generating dataset...");
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut xs = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..samples_per_class {
        xs.push(rng.gen_range(-0.05..1.0));
        labels.push(1.0f32);
        xs.push(rng.gen_range(-1.0..0.05));
        labels.push(-1.0f32);
    }
    println!("  Samples: {}", xs.len());
    println!();

    println!("🎓 Training stages...");
    let mut cascade = Cascade::new();

    for stage_idx in 0..num_stages {
        let mut stage: GentleBoost<RegressionTreeData> = GentleBoost::new();
        let mut stop = rate_targets(&labels, config.rate_targets());
        let split = stage_idx as f32 * 0.02;

        let rounds = stage.train(
            &labels,
            |weights| {
                // Depth-2 stump at this stage's split point; each leaf is
                // the weighted mean label on its side.
                let mut sums = [0.0f32; 2];
                let mut mass = [0.0f32; 2];
                for ((&x, &label), &weight) in xs.iter().zip(&labels).zip(weights) {
                    let side = usize::from(x >= split);
                    sums[side] += weight * label;
                    mass[side] += weight;
                }
                let leaf =
                    |side: usize| if mass[side] > 0.0 { sums[side] / mass[side] } else { 0.0 };
                RegressionTreeData::new(2, vec![stage_idx as i32], vec![leaf(0), leaf(1)])
            },
            |stump, i| stump.leaf_values()[usize::from(xs[i] >= split)],
            |learners: &[RegressionTreeData], outputs: &[f32]| {
                logging::log_round(&config.log_dir, learners.len(), learners.len(), outputs)
                    .ok();
                stop(learners, outputs)
            },
        )?;

        println!(
            "  Stage {}: {} learners after {} rounds",
            stage_idx + 1,
            stage.len(),
            rounds
        );
        cascade.push_stage(stage, config.decision_threshold);
    }
    println!();

    println!("💾 Writing artifact...");
    let detector = Detector::new(NormalizedRegion::new(0.0, 0.0, 1.0, 1.0), cascade);
    let bytes = encode_binary(&detector)?;
    let artifact = std::path::Path::new("detector.hex");
    to_hex_file(&detector, artifact)?;
    logging::log_artifact(
        &config.log_dir,
        artifact,
        bytes.len(),
        detector.cascade().num_stages(),
    )?;

    println!("  {} stages, {} bytes -> {}", detector.cascade().num_stages(), bytes.len(), artifact.display());
    println!("\n✅ Done");
    Ok(())
}
