//! Secret token allocation.
//!
//! Tokens come from a [`StdRng`] seeded by the operating system. If the OS entropy source is unavailable the
//! allocator logs a warning and falls back to a generator seeded from the clock and the process id; allocation itself
//! never fails.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use framejudge_core::Token;
use framejudge_core::framing::contains_frame;
use framejudge_core::token::{DEFAULT_TOKEN_LENGTH, MIN_TOKEN_LENGTH};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::descriptor::{Command, Context, Expr, Literal};

/// Hands out tokens that are unique for the allocator's lifetime.
#[derive(Debug)]
pub struct TokenAllocator {
    rng: StdRng,
    issued: HashSet<Token>,
    length: usize,
}

impl TokenAllocator {
    /// Allocator seeded from the OS entropy source.
    pub fn new() -> Self {
        let rng = StdRng::try_from_os_rng().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "OS entropy unavailable, seeding tokens from clock and pid");
            StdRng::seed_from_u64(fallback_seed())
        });
        Self::with_rng(rng)
    }

    /// Deterministic allocator, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
            length: DEFAULT_TOKEN_LENGTH,
        }
    }

    /// Set the length of allocated tokens (raised to the protocol minimum).
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.max(MIN_TOKEN_LENGTH);
        self
    }

    /// Allocate a token not handed out before by this allocator.
    pub fn allocate(&mut self) -> Token {
        loop {
            let rng = &mut self.rng;
            let token = Token::from_indices(self.length, |n| rng.random_range(0..n));
            if self.issued.insert(token.clone()) {
                return token;
            }
        }
    }

    /// Allocate a token whose frame occurs nowhere in `context`'s own strings.
    pub fn allocate_for(&mut self, context: &Context) -> Token {
        let texts = descriptor_texts(context);
        loop {
            let token = self.allocate();
            if !texts.iter().any(|text| contains_frame(text, token.as_str())) {
                return token;
            }
            tracing::debug!(token = %token, "token frame collides with descriptor data, retrying");
        }
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ (u64::from(std::process::id()) << 32)
}

/// Every free-form string of a descriptor: arguments, text literals and raw code.
pub fn descriptor_texts(context: &Context) -> Vec<&str> {
    let mut texts: Vec<&str> = Vec::new();
    texts.extend(context.before.values().map(String::as_str));
    texts.extend(context.after.values().map(String::as_str));
    if let Some(main) = &context.main {
        texts.extend(main.arguments.iter().map(String::as_str));
    }
    for testcase in &context.testcases {
        if let Command::Assignment { variable, .. } = &testcase.command {
            texts.push(variable);
        }
        testcase.command.expression().walk(&mut |expr| {
            if let Expr::Literal {
                value: Literal::Text(text),
            } = expr
            {
                texts.push(text);
            }
        });
    }
    texts
}
