/// One timed point of a series: search time at a given occupancy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement<'a> {
    pub name: &'a str,
    pub occupancy: u32,
    pub seconds: f64,
}
