use std::ops::{Add, AddAssign, Mul};

// Galois field GF(256)
//------------------------------------------------------------------------------

/// Element of GF(256) reduced by x^8 + x^4 + x^3 + x^2 + 1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct G(pub u8);

impl G {
    /// Returns α^i.
    pub fn gen_pow(i: usize) -> Self {
        Self(EXP_TABLE[i % 255])
    }

    /// Discrete log, undefined for zero.
    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }
}

impl From<G> for u8 {
    fn from(g: G) -> u8 {
        g.0
    }
}

// Addition and subtraction are both xor
impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return Self(0);
        }
        Self::gen_pow(self.log() + rhs.log())
    }
}

/// Coefficients of (x - α^0)(x - α^1)...(x - α^(degree-1)), highest degree first. The
/// leading coefficient is always 1.
pub fn generator_polynomial(degree: usize) -> Vec<G> {
    let mut poly = Vec::with_capacity(degree + 1);
    poly.push(G(1));
    for i in 0..degree {
        let root = G::gen_pow(i);
        poly.push(G(0));
        for j in (1..poly.len()).rev() {
            let prev = poly[j - 1];
            poly[j] += prev * root;
        }
    }
    poly
}


// Global constants
//------------------------------------------------------------------------------

const PRIMITIVE_POLYNOMIAL: u16 = 0x11d;

pub static EXP_TABLE: [u8; 256] = build_exp_table();

pub static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}
