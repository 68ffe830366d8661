use std::fmt::Debug;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use xxhash_rust::xxh3::Xxh3Builder;

pub use alphabet::{IdAlphabet, IdAlphabetError};

mod alphabet;

/// Mints short identifiers used as scope tokens and instance class suffixes.
///
/// Allocated ids always start with a letter. Uniqueness is only as strong as the
/// strategy behind the allocator: the random allocator avoids collisions
/// probabilistically, the sequential one never repeats within one allocator.
pub trait IdAllocator: Debug + Send + Sync {
  fn allocate(&self, length: usize) -> String;
}

/// Generates a random id of `length` characters with the default alphabet.
pub fn generate_id(length: usize) -> String {
  RandomIdAllocator::default().allocate(length)
}

#[derive(Debug, Default)]
pub struct RandomIdAllocator {
  alphabet: IdAlphabet,
}

impl RandomIdAllocator {
  pub fn new(alphabet: IdAlphabet) -> Self {
    RandomIdAllocator { alphabet }
  }
}

impl IdAllocator for RandomIdAllocator {
  fn allocate(&self, length: usize) -> String {
    let mut rng = rand::thread_rng();
    let letters = self.alphabet.letters();
    let digits = self.alphabet.digits();

    let mut id = String::with_capacity(length.max(1));
    id.push(letters[rng.gen_range(0..letters.len())]);

    for _ in 1..length {
      // Digits and letters are equally likely, regardless of how many of each there are
      let next = if !digits.is_empty() && rng.gen_bool(0.5) {
        digits[rng.gen_range(0..digits.len())]
      } else {
        letters[rng.gen_range(0..letters.len())]
      };
      id.push(next);
    }

    id
  }
}

/// Deterministic allocator that encodes a counter, e.g. `a0000000`, `a0000001`, ...
///
/// Ids grow past the requested length instead of wrapping once the counter no
/// longer fits, so they stay unique for the lifetime of the allocator.
#[derive(Debug, Default)]
pub struct SequentialIdAllocator {
  alphabet: IdAlphabet,
  next: AtomicU64,
}

impl SequentialIdAllocator {
  pub fn new(alphabet: IdAlphabet) -> Self {
    SequentialIdAllocator {
      alphabet,
      next: AtomicU64::new(0),
    }
  }
}

impl IdAllocator for SequentialIdAllocator {
  fn allocate(&self, length: usize) -> String {
    let value = self.next.fetch_add(1, Ordering::Relaxed);
    let encoded = self.alphabet.encode(value);
    let padding = self.alphabet.symbols()[0];

    let mut id = String::with_capacity(length.max(1 + encoded.len()));
    id.push(self.alphabet.letters()[0]);
    for _ in (encoded.len() + 1)..length {
      id.push(padding);
    }
    id.extend(encoded);

    id
  }
}

/// Derives ids from a seed (typically the stylesheet source) and a call counter.
///
/// The leading letter is picked by the hash modulo the number of letters, the
/// rest is the hash written in the alphabet's symbols (base 62 by default).
/// Two allocators with the same seed hand out the same sequence of ids, which
/// keeps generated class names stable between builds.
#[derive(Debug)]
pub struct ContentHashIdAllocator {
  alphabet: IdAlphabet,
  seed: String,
  calls: AtomicU64,
}

impl ContentHashIdAllocator {
  pub fn new(seed: impl Into<String>) -> Self {
    Self::with_alphabet(seed, IdAlphabet::default())
  }

  pub fn with_alphabet(seed: impl Into<String>, alphabet: IdAlphabet) -> Self {
    ContentHashIdAllocator {
      alphabet,
      seed: seed.into(),
      calls: AtomicU64::new(0),
    }
  }
}

impl IdAllocator for ContentHashIdAllocator {
  fn allocate(&self, length: usize) -> String {
    let call = self.calls.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Xxh3Builder::new().build();
    hasher.write(self.seed.as_bytes());
    hasher.write(&[0]);
    hasher.write(&call.to_le_bytes());
    let hash = hasher.finish();

    let letters = self.alphabet.letters();
    let mut id = String::with_capacity(length.max(1));
    id.push(letters[(hash % letters.len() as u64) as usize]);

    let mut body = self.alphabet.encode(hash).into_iter();
    let padding = self.alphabet.symbols()[0];
    for _ in 1..length {
      id.push(body.next().unwrap_or(padding));
    }

    id
  }
}
