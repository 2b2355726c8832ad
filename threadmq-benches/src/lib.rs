//! Benchmarks for `threadmq`, see `benches/`.
