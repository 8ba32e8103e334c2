use crate::error::BenchError;

pub const SEED: u32 = 0x12345678;
pub const SEED2: u32 = 0x87654321;

/// A record that can be stored in an [`OpenTable`].
///
/// The table never owns keys separately, it asks the record for its key every
/// time a slot is compared or rehashed.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Collision resolution used when the home slot is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// Linear probing, step 1.
    Simple,
    /// Step taken from a second hash of the key, in `1..=7`.
    Double,
}

impl Probe {
    pub fn name(&self) -> &'static str {
        match self {
            Probe::Simple => "Hash Simples",
            Probe::Double => "Hash Dupla",
        }
    }

    fn step(&self, key: &str) -> usize {
        match self {
            Probe::Simple => 1,
            Probe::Double => step_hash(key) as usize,
        }
    }
}

/// Bytes are mixed in as signed chars, so bytes of 0x80 and above are
/// sign-extended before the xor.
pub fn hash_str(key: &str, seed: u32) -> u32 {
    let mut h = seed;
    for b in key.bytes() {
        h ^= b as i8 as u32;
        h = h.wrapping_mul(0x5bd1e995);
        h ^= h >> 15;
    }
    h
}

pub fn step_hash(key: &str) -> u32 {
    hash_str(key, SEED2) % 7 + 1
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Empty,
    Deleted,
    Occupied(T),
}

impl<T> Slot<T> {
    #[cfg(test)]
    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// Open-addressing hash table with tombstone deletion.
///
/// The table doubles its slot count before an insert whenever the current
/// load factor has reached `max_load`. Every probe sequence is bounded by the
/// slot count, so a double-hash step that shares a factor with the capacity
/// cannot spin forever.
#[derive(Clone, Debug)]
pub struct OpenTable<T: Keyed> {
    slots: Vec<Slot<T>>,
    len: usize,
    max_load: f32,
    probe: Probe,
}

impl<T: Keyed> OpenTable<T> {
    pub fn new(capacity: usize, max_load: f32, probe: Probe) -> Result<Self, BenchError> {
        if capacity == 0 {
            return Err(BenchError::ZeroCapacity);
        }

        Ok(Self {
            slots: new_slots(capacity),
            len: 0,
            max_load,
            probe,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.slots.len() as f32
    }

    /// Slot indices visited for `key`, starting at its home slot.
    fn probe_seq(&self, key: &str) -> impl Iterator<Item = usize> {
        let max = self.slots.len();
        let home = hash_str(key, SEED) as usize % max;
        let step = self.probe.step(key);
        (0..max).map(move |i| (home + i * step) % max)
    }

    pub fn insert(&mut self, record: T) {
        if self.load_factor() >= self.max_load {
            self.grow();
        }

        let mut record = record;
        loop {
            match self.place(record) {
                Ok(()) => {
                    self.len += 1;
                    return;
                }
                Err(back) => {
                    // every slot on the probe cycle is live
                    record = back;
                    self.grow();
                }
            }
        }
    }

    fn place(&mut self, record: T) -> Result<(), T> {
        let free = self
            .probe_seq(record.key())
            .find(|&pos| !matches!(self.slots[pos], Slot::Occupied(_)));

        match free {
            Some(pos) => {
                self.slots[pos] = Slot::Occupied(record);
                Ok(())
            }
            None => Err(record),
        }
    }

    fn grow(&mut self) {
        self.rehash(self.slots.len() * 2);
    }

    /// Moves every live record into a table of `capacity` slots, doubling
    /// again while some record finds its probe cycle full.
    fn rehash(&mut self, capacity: usize) {
        let mut capacity = capacity;
        let mut records = self.take_live();

        loop {
            tracing::debug!(to = capacity, probe = ?self.probe, "resizing table");
            self.slots = new_slots(capacity);

            let mut rest = records.into_iter();
            let mut overflow = None;
            for record in rest.by_ref() {
                if let Err(back) = self.place(record) {
                    overflow = Some(back);
                    break;
                }
            }

            match overflow {
                None => return,
                Some(back) => {
                    records = self.take_live();
                    records.push(back);
                    records.extend(rest);
                    capacity *= 2;
                }
            }
        }
    }

    fn take_live(&mut self) -> Vec<T> {
        std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Occupied(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    fn find_pos(&self, key: &str) -> Option<usize> {
        for pos in self.probe_seq(key) {
            match &self.slots[pos] {
                Slot::Empty => return None,
                Slot::Deleted => {}
                Slot::Occupied(record) if record.key() == key => return Some(pos),
                Slot::Occupied(_) => {}
            }
        }
        None
    }

    pub fn search(&self, key: &str) -> Option<&T> {
        self.find_pos(key).and_then(|pos| match &self.slots[pos] {
            Slot::Occupied(record) => Some(record),
            _ => None,
        })
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let pos = self.find_pos(key)?;
        match std::mem::replace(&mut self.slots[pos], Slot::Deleted) {
            Slot::Occupied(record) => {
                self.len -= 1;
                Some(record)
            }
            other => {
                self.slots[pos] = other;
                None
            }
        }
    }

    /// Live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(record) => Some(record),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_empty()).count()
    }
}

fn new_slots<T>(capacity: usize) -> Vec<Slot<T>> {
    std::iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}
