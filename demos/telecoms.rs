use std::thread;
use std::time::Duration;

use dtmfrs::DtmfToneGenerator;

// Plays `on` seconds of tone then `off` seconds of silence, `times` times.
fn cadence(generator: &DtmfToneGenerator, on: f64, off: f64, times: usize) {
    for _ in 0..times {
        generator.play_for_duration(on).expect("failed");
        thread::sleep(Duration::from_secs_f64(on + off));
    }
}

fn main() {
    // North American precise tone plan
    let dialtone = DtmfToneGenerator::from_frequency_pair(350, 440).expect("failed");
    dialtone.play_for_duration(3.0).expect("failed");
    thread::sleep(Duration::from_secs(3));

    let busysignal = DtmfToneGenerator::from_frequency_pair(480, 620).expect("failed");
    cadence(&busysignal, 0.5, 0.5, 4);

    let fastbusysignal = DtmfToneGenerator::from_frequency_pair(480, 620).expect("failed");
    cadence(&fastbusysignal, 0.25, 0.25, 8);

    let ring = DtmfToneGenerator::from_frequency_pair(440, 480).expect("failed");
    cadence(&ring, 2.0, 4.0, 2);

    // Indefinite tone, stopped by hand
    let test_tone = DtmfToneGenerator::from_frequency(1_004).expect("failed");
    test_tone.play().expect("failed");
    thread::sleep(Duration::from_secs(1));
    test_tone.stop();
}
