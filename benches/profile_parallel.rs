//! Parallel query benchmark to measure concurrent access performance
//!
//! This benchmark uses the SAME frame and queries as profile_bench.rs so results are
//! directly comparable. Queries only require &self, so one engine is shared by all
//! threads through scoped borrows, no locking involved.

use organized_search::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use std::hint::black_box;
use std::thread;
use std::time::Instant;

const INV_FOCAL: f64 = 0.0018;

fn main() {
    println!("Organized Search Parallel Query Benchmark (vs profile_bench.rs)");
    println!("===============================================================\n");

    let num_tests = 1_000;
    let num_threads = 10;

    // SAME seed as profile_bench.rs
    let seed = 95756739_u64;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    println!("Generating 640x480 frame...");
    let gen_start = Instant::now();
    let (width, height) = (640, 480);
    let mut points = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let z = rng.random_range(20.0..35.0);
            let x = (col as f64 - 320.0) * INV_FOCAL * z;
            let y = (row as f64 - 240.0) * INV_FOCAL * z;
            points.push(Point3::new(x, y, z));
        }
    }
    let cloud = OrganizedCloud::new(width, height, points);
    println!("  Generated in {:.2}ms\n", gen_start.elapsed().as_secs_f64() * 1000.0);

    let mut search = OrganizedNeighborSearch::new(INV_FOCAL).expect("valid focal length");
    search.set_input_cloud(&cloud).expect("organized cloud");
    let queries: Vec<usize> = (0..num_tests).map(|_| rng.random_range(0..cloud.len())).collect();

    println!("Profiling nearest_k_search (parallel):");
    println!("{}", "-".repeat(40));

    for k in [1, 10, 50] {
        let total_queries = num_threads * num_tests;
        let parallel_start = Instant::now();

        thread::scope(|s| {
            for _ in 0..num_threads {
                let (search, queries) = (&search, &queries);
                let _handle = s.spawn(move || {
                    for &i in queries {
                        let _result = black_box(search.nearest_k_search_at(i, k).expect("valid query"));
                    }
                });
            }
        });

        let parallel_elapsed = parallel_start.elapsed();
        println!(
            "  {} queries k={} (parallel {}x{}):      {:.2}ms ({:.3}us/query)",
            total_queries,
            k,
            num_threads,
            num_tests,
            parallel_elapsed.as_secs_f64() * 1000.0,
            parallel_elapsed.as_secs_f64() * 1_000_000.0 / total_queries as f64
        );
    }

    println!("\nProfiling radius_search (parallel):");
    println!("{}", "-".repeat(40));

    for radius in [0.05, 0.2] {
        let total_queries = num_threads * num_tests;
        let parallel_start = Instant::now();

        thread::scope(|s| {
            for _ in 0..num_threads {
                let (search, queries) = (&search, &queries);
                let _handle = s.spawn(move || {
                    for &i in queries {
                        let _result = black_box(search.radius_search_at(i, radius, None).expect("valid query"));
                    }
                });
            }
        });

        let parallel_elapsed = parallel_start.elapsed();
        println!(
            "  {} queries r={} (parallel {}x{}):   {:.2}ms ({:.3}us/query)",
            total_queries,
            radius,
            num_threads,
            num_tests,
            parallel_elapsed.as_secs_f64() * 1000.0,
            parallel_elapsed.as_secs_f64() * 1_000_000.0 / total_queries as f64
        );
    }
}

/*
cargo bench --bench profile_parallel
*/
