use drossel::Throttle;
use drossel::futures::ThrottledReadExt;
use tokio::io::AsyncReadExt;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> std::io::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "Cargo.toml".into());
    let file = tokio::fs::File::open(&path).await?;
    let mut reader = file.throttled(Throttle::kib_per_sec(1));

    let start = tokio::time::Instant::now();
    let mut buf = vec![0u8; 4096];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        println!("read {n} bytes, elapsed={:?}", start.elapsed());
    }

    println!(
        "done: {} bytes of {path} in {:?}",
        reader.consumed(),
        start.elapsed()
    );
    Ok(())
}
