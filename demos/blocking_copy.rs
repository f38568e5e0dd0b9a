use std::io::Read;
use std::time::Instant;

use drossel::{Throttle, ThrottledReader};

fn main() {
    // 64 KiB drained at 16 KiB/s should take roughly four seconds
    let payload = vec![0u8; 64 * 1024];
    let source = std::io::Cursor::new(payload);
    let mut reader = ThrottledReader::new(source, Throttle::kib_per_sec(16));

    let start = Instant::now();
    let mut sink = Vec::new();
    reader.read_to_end(&mut sink).unwrap();

    println!(
        "copied {} bytes in {:?} ({} bytes/s ceiling)",
        sink.len(),
        start.elapsed(),
        reader.throttle().bytes_per_sec()
    );
}
