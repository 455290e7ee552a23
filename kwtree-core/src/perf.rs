// Quick release mode performance check
//
// Run with: cargo test --release -p kwtree-core search_perf -- --ignored

#[cfg(test)]
mod perf_tests {
    use crate::KeywordTree;
    use std::time::Instant;

    #[test]
    #[ignore] // Run with: cargo test --release search_perf -- --ignored
    fn search_perf() {
        let mut tree = KeywordTree::new(true);
        tree.add_all((0..100).map(|i| format!("pattern_{}", i))).unwrap();
        tree.finalize().unwrap();

        let text = "a fairly ordinary line of text ending in PATTERN_42";

        // Warmup
        for _ in 0..10000 {
            let _ = tree.search(text);
        }

        let iterations = 1_000_000;
        let start = Instant::now();
        for _ in 0..iterations {
            let _ = tree.search(text);
        }
        let duration = start.elapsed();
        let ns_per_op = duration.as_nanos() / iterations;

        println!("\n=== Release Mode Keyword Tree Search ===");
        println!("Iterations: {}", iterations);
        println!("Total time: {:?}", duration);
        println!("Per operation: {} ns", ns_per_op);
        println!(
            "Throughput: {:.2} M ops/sec",
            (iterations as f64 / duration.as_secs_f64()) / 1_000_000.0
        );

        assert!(
            ns_per_op < 5_000,
            "search should be fast in release mode, got {} ns/op",
            ns_per_op
        );
    }
}
