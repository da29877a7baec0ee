//! Random switching demo: the tempo-synced randomizer and crossfade clock
//! driving the reverb's voice pattern over a simulated transport.
//!
//! Run with: cargo run -p switchverb-engine --example random_switch_demo

use switchverb_engine::{
    FadeTiming, FilterTarget, RandomRate, Reverb, TempoSyncedRandomizer,
};

fn pattern(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { 'x' } else { '.' }).collect()
}

fn main() {
    let sample_rate = 48000.0;
    let bpm = 120.0;
    let block_size = 512;

    // --- Crossfade lengths at this tempo ---
    println!("=== Crossfade lengths at {bpm} BPM, {sample_rate} Hz ===\n");
    println!("{:<16} {:>10} {:>10}", "Timing", "Samples", "ms");
    println!("{:-<16} {:->10} {:->10}", "", "", "");

    let mut verb = Reverb::new(sample_rate);
    let timings = [
        ("Immediate", FadeTiming::Immediate),
        ("1/64 note", FadeTiming::SixtyFourth),
        ("1/32 note", FadeTiming::ThirtySecond),
        ("1/16 note", FadeTiming::Sixteenth),
        ("1/8 note", FadeTiming::Eighth),
        ("1/4 note", FadeTiming::Quarter),
    ];
    verb.process_tempo(bpm, 0.0); // observe the tempo once
    for (name, timing) in timings {
        verb.crossfade_mut().set_timing(timing);
        let samples = verb.crossfade().fade_samples();
        println!(
            "{:<16} {:>10} {:>10.1}",
            name,
            samples,
            f64::from(samples) * 1000.0 / sample_rate
        );
    }

    // --- Randomized switching over 8 bars ---
    println!("\n=== Voice pattern over 8 bars (quarter-note rate) ===\n");

    *verb.randomizer_mut() = TempoSyncedRandomizer::with_seed(2024);
    verb.randomizer_mut().set_enabled(true);
    verb.randomizer_mut().set_rate(RandomRate::QuarterNote);
    verb.randomizer_mut().set_target(FilterTarget::Both);
    verb.randomizer_mut().set_amount(0.4);
    verb.crossfade_mut().set_timing(FadeTiming::ThirtySecond);

    println!("{:<8} {:<10} {:<6} {}", "PPQ", "Combs", "APs", "Changed");
    println!("{:-<8} {:-<10} {:-<6} {:-<7}", "", "", "", "");

    let mut left = vec![0.0f32; block_size];
    let mut right = vec![0.0f32; block_size];
    let samples_per_beat = sample_rate * 60.0 / bpm;
    let blocks_per_beat = (samples_per_beat / block_size as f64).ceil() as usize;

    for beat in 0..32 {
        let mut changed = false;
        for block in 0..blocks_per_beat {
            let ppq = f64::from(beat) + block as f64 * block_size as f64 / samples_per_beat;
            changed |= verb.process_tempo(bpm, ppq);

            // Keep a little signal flowing through the network
            left[0] = 0.5;
            right[0] = 0.5;
            verb.process_stereo(&mut left, &mut right);
        }

        let (combs, all_passes) = verb.enablement();
        println!(
            "{:<8} {:<10} {:<6} {}",
            beat,
            pattern(&combs),
            pattern(&all_passes),
            if changed { "*" } else { "" }
        );
    }
}
