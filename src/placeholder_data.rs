//! Sample search times charted when no benchmark has been run.
//! Replace with the output of `hash-probe-bench bench <csv>`.

pub const OCCUPANCY_RATES: [f64; 10] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 99.0];

pub const SEARCH_TIMES_SIMPLE: [f64; 10] = [
    0.000002, 0.000001, 0.000002, 0.000001, 0.000002, 0.000002, 0.000001, 0.000001, 0.000001,
    0.000002,
];

pub const SEARCH_TIMES_DOUBLE: [f64; 10] = [
    0.000002, 0.000001, 0.000002, 0.000000, 0.000001, 0.000002, 0.000001, 0.000001, 0.000001,
    0.000002,
];
