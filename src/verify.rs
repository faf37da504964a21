//! Self-verification driver.
//!
//! Generates random words, masks and stream-compaction data, then checks the
//! bit compress/expand identities, agreement between every lane width and the
//! scalar loop, agreement between the bulk engine kernels and the scalar
//! loop, and the selective store against scan-and-append. Mismatches are
//! counted per check and logged; they do not abort the run.

use std::fmt;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::bit_permute_kernels::{
    par_permute_u32, par_permute_u64, permute_u32_scalar, permute_u32_with, permute_u64_scalar,
    permute_u64_with, PermuteOp,
};
use crate::compute::{backend_description, PermuteBackend, PermuteContext};
use crate::core::bit_permute::BitPermute;
use crate::error::LaneError;
use crate::kernels::{
    compress_bits_lanewise, expand_bits_lanewise, selective_store, selective_store_scalar,
};
use crate::lanes::{ExceptionalIndex, LaneMask, ReductionOp, Shuffle, Vector};
use crate::verify_opt::VerifyOpt;

/// Cases checked and mismatches found by one named check, summed over rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub cases: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub backend: PermuteBackend,
    pub checks: Vec<CheckOutcome>,
}

impl VerifyReport {
    fn new(backend: PermuteBackend) -> Self {
        VerifyReport {
            backend,
            checks: Vec::new(),
        }
    }

    fn record(&mut self, round: usize, name: &'static str, cases: usize, mismatches: usize) {
        if mismatches > 0 {
            log::warn!(
                "Round {}: {} found {} mismatches in {} cases",
                round,
                name,
                mismatches,
                cases
            );
        }
        match self.checks.iter_mut().find(|c| c.name == name) {
            Some(check) => {
                check.cases += cases;
                check.mismatches += mismatches;
            }
            None => self.checks.push(CheckOutcome {
                name,
                cases,
                mismatches,
            }),
        }
    }

    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.mismatches == 0)
    }

    pub fn total_cases(&self) -> usize {
        self.checks.iter().map(|c| c.cases).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| c.mismatches > 0)
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Backend: {}", backend_description(self.backend))?;
        for check in &self.checks {
            writeln!(
                f,
                "{:<24} {:>10} cases  {:>6} mismatches  {}",
                check.name,
                check.cases,
                check.mismatches,
                if check.mismatches == 0 { "ok" } else { "FAILED" }
            )?;
        }
        write!(
            f,
            "{} cases, {}",
            self.total_cases(),
            if self.passed() { "all passed" } else { "FAILURES" }
        )
    }
}

/// Runs every check for `opt.rounds` rounds, on a dedicated thread pool when
/// `opt.threads` is set.
pub fn run_verify(opt: &VerifyOpt) -> Result<VerifyReport> {
    match opt.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n.max(1))
                .build()
                .context("Failed to build verification thread pool")?;
            pool.install(|| run_rounds(opt))
        }
        None => run_rounds(opt),
    }
}

fn run_rounds(opt: &VerifyOpt) -> Result<VerifyReport> {
    let backend = opt.backend.effective_backend();
    log::info!(
        "Verifying {} rounds of {} words on {}",
        opt.rounds,
        opt.length,
        backend_description(backend)
    );
    let mut report = VerifyReport::new(backend);
    check_worked_examples(&mut report);

    for round in 0..opt.rounds {
        let seed = opt.seed.wrapping_add(round as u64);
        log::debug!("Round {} seed {:#x}", round, seed);
        let mut rng = StdRng::seed_from_u64(seed);

        check_bit_laws(&mut rng, opt, round, &mut report);
        check_lanewise_widths(&mut rng, opt, round, &mut report)?;
        check_engine_kernels(&mut rng, opt, round, &mut report)?;
        check_selective_store(&mut rng, opt, round, &mut report)?;
        check_rearrange(&mut rng, opt, round, &mut report)?;
        check_reductions(&mut rng, opt, round, &mut report)?;
    }

    log::info!(
        "Verification {}: {} cases",
        if report.passed() { "passed" } else { "failed" },
        report.total_cases()
    );
    Ok(report)
}

fn count_diffs<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let tail = a.len().abs_diff(b.len());
    a.iter().zip(b).filter(|(x, y)| x != y).count() + tail
}

// Masks of varied density: sparse, uniform and dense.
fn random_mask<T>(rng: &mut StdRng) -> T
where
    T: Copy + std::ops::BitAnd<Output = T> + std::ops::BitOr<Output = T>,
    rand::distributions::Standard: rand::distributions::Distribution<T>,
{
    let (a, b): (T, T) = (rng.gen(), rng.gen());
    match rng.gen_range(0..3) {
        0 => a & b,
        1 => a,
        _ => a | b,
    }
}

// ============================================================================
// Word-level checks
// ============================================================================

fn check_worked_examples(report: &mut VerifyReport) {
    let cases = [
        0xCAFE_BABEu32.compress_bits(0xFF00_FFF0) == 0xCABAB,
        0x000C_ABABu32.expand_bits(0xFF00_FFF0) == 0xCA00_BAB0,
        0xCAFE_BABEu32.sheep_and_goats(0xFF00_FFF0) == 0xCABA_BFEE,
    ];
    let mismatches = cases.iter().filter(|ok| !**ok).count();
    report.record(0, "worked_examples", cases.len(), mismatches);
}

macro_rules! bit_laws {
    ($name:ident, $t:ty) => {
        fn $name(x: $t, m: $t, n: u32) -> bool {
            let all = <$t>::MAX;
            let packed_mask = if m == 0 || m == all {
                m
            } else {
                ((1 as $t) << m.count_ones()) - 1
            };
            x.compress_bits(m) == (x & m).compress_bits(m)
                && x.compress_bits((1 as $t) << n) == (x >> n) & 1
                && x.compress_bits(all << n) == x >> n
                && m.compress_bits(m) == packed_mask
                && x.expand_bits(m).compress_bits(m) == x & packed_mask
                && x.expand_bits((1 as $t) << n) == (x & 1) << n
                && x.expand_bits(all << n) == x << n
                && all.expand_bits(m) == m
                && x.expand_bits(m) & m == x.expand_bits(m)
                && x.compress_bits(m).expand_bits(m) == x & m
        }
    };
}

bit_laws!(bit_laws_hold_u32, u32);
bit_laws!(bit_laws_hold_u64, u64);

fn check_bit_laws(rng: &mut StdRng, opt: &VerifyOpt, round: usize, report: &mut VerifyReport) {
    let mut failed32 = 0;
    let mut failed64 = 0;
    for _ in 0..opt.length {
        let (x, m, n) = (rng.gen::<u32>(), random_mask::<u32>(rng), rng.gen_range(0..32));
        if !bit_laws_hold_u32(x, m, n) {
            failed32 += 1;
        }
        let (x, m, n) = (rng.gen::<u64>(), random_mask::<u64>(rng), rng.gen_range(0..64));
        if !bit_laws_hold_u64(x, m, n) {
            failed64 += 1;
        }
    }
    report.record(round, "bit_laws_32", opt.length, failed32);
    report.record(round, "bit_laws_64", opt.length, failed64);
}

// ============================================================================
// Lane-model checks
// ============================================================================

// Runs a lanewise kernel at every listed lane count and counts the elements
// that differ from `expected`.
macro_rules! across_widths {
    ($kernel:ident, $t:ty, $input:expr, $masks:expr, $expected:expr, [$($n:literal),*]) => {{
        let mut mismatches = 0;
        $(
            let mut out = vec![<$t>::default(); $input.len()];
            $kernel::<$t, $n>($input, $masks, &mut out)
                .with_context(|| format!("{} over {} lanes", stringify!($kernel), $n))?;
            mismatches += count_diffs(&out, $expected);
        )*
        mismatches
    }};
}

fn check_lanewise_widths(
    rng: &mut StdRng,
    opt: &VerifyOpt,
    round: usize,
    report: &mut VerifyReport,
) -> Result<()> {
    let input32: Vec<i32> = (0..opt.length).map(|_| rng.gen()).collect();
    let masks32: Vec<i32> = (0..opt.length).map(|_| random_mask(rng)).collect();
    let compressed: Vec<i32> = input32.iter().zip(&masks32).map(|(&x, &m)| x.compress_bits(m)).collect();
    let expanded: Vec<i32> = input32.iter().zip(&masks32).map(|(&x, &m)| x.expand_bits(m)).collect();

    let mut mismatches = across_widths!(compress_bits_lanewise, i32, &input32, &masks32, &compressed, [2, 4, 8, 16]);
    mismatches += across_widths!(expand_bits_lanewise, i32, &input32, &masks32, &expanded, [2, 4, 8, 16]);
    report.record(round, "lanewise_widths_32", 8 * opt.length, mismatches);

    let input64: Vec<i64> = (0..opt.length).map(|_| rng.gen()).collect();
    let masks64: Vec<i64> = (0..opt.length).map(|_| random_mask(rng)).collect();
    let compressed: Vec<i64> = input64.iter().zip(&masks64).map(|(&x, &m)| x.compress_bits(m)).collect();
    let expanded: Vec<i64> = input64.iter().zip(&masks64).map(|(&x, &m)| x.expand_bits(m)).collect();

    let mut mismatches = across_widths!(compress_bits_lanewise, i64, &input64, &masks64, &compressed, [1, 2, 4, 8]);
    mismatches += across_widths!(expand_bits_lanewise, i64, &input64, &masks64, &expanded, [1, 2, 4, 8]);
    report.record(round, "lanewise_widths_64", 8 * opt.length, mismatches);
    Ok(())
}

fn check_engine_kernels(
    rng: &mut StdRng,
    opt: &VerifyOpt,
    round: usize,
    report: &mut VerifyReport,
) -> Result<()> {
    let ctx = PermuteContext {
        backend: opt.backend,
        parallel_threshold: opt.parallel_threshold,
    };

    let input: Vec<u32> = (0..opt.length).map(|_| rng.gen()).collect();
    let masks: Vec<u32> = (0..opt.length).map(|_| random_mask(rng)).collect();
    let mut expected = vec![0u32; opt.length];
    let mut out = vec![0u32; opt.length];
    let mut mismatches = 0;
    for op in [PermuteOp::Compress, PermuteOp::Expand] {
        permute_u32_scalar(op, &input, &masks, &mut expected);
        permute_u32_with(opt.backend, op, &input, &masks, &mut out).context("32-bit engine kernel")?;
        mismatches += count_diffs(&out, &expected);
        par_permute_u32(&ctx, op, &input, &masks, &mut out).context("32-bit parallel kernel")?;
        mismatches += count_diffs(&out, &expected);
    }
    report.record(round, "engine_vs_scalar_32", 4 * opt.length, mismatches);

    let input: Vec<u64> = (0..opt.length).map(|_| rng.gen()).collect();
    let masks: Vec<u64> = (0..opt.length).map(|_| random_mask(rng)).collect();
    let mut expected = vec![0u64; opt.length];
    let mut out = vec![0u64; opt.length];
    let mut mismatches = 0;
    for op in [PermuteOp::Compress, PermuteOp::Expand] {
        permute_u64_scalar(op, &input, &masks, &mut expected);
        permute_u64_with(opt.backend, op, &input, &masks, &mut out).context("64-bit engine kernel")?;
        mismatches += count_diffs(&out, &expected);
        par_permute_u64(&ctx, op, &input, &masks, &mut out).context("64-bit parallel kernel")?;
        mismatches += count_diffs(&out, &expected);
    }
    report.record(round, "engine_vs_scalar_64", 4 * opt.length, mismatches);
    Ok(())
}

macro_rules! selective_widths {
    ($t:ty, $a:expr, $b:expr, $idx:expr, $expected:expr, $count:expr, [$($n:literal),*]) => {{
        let mut mismatches = 0;
        $(
            let mut out = vec![<$t>::default(); $a.len()];
            let count = selective_store::<$t, $n>($a, $b, $idx, &mut out)
                .with_context(|| format!("selective store over {} lanes", $n))?;
            mismatches += count.abs_diff($count) + count_diffs(&out[..count], &$expected[..$count]);
        )*
        mismatches
    }};
}

fn check_selective_store(
    rng: &mut StdRng,
    opt: &VerifyOpt,
    round: usize,
    report: &mut VerifyReport,
) -> Result<()> {
    let len = opt.length;
    let a: Vec<i32> = (0..len).map(|_| rng.gen()).collect();
    let b: Vec<i32> = a
        .iter()
        .map(|&x| if rng.gen_bool(opt.mismatch_rate) { x ^ (rng.gen::<i32>() | 1) } else { x })
        .collect();
    let idx: Vec<i32> = (0..len).map(|_| rng.gen_range(0..len.max(1)) as i32).collect();
    let mut expected = vec![0i32; len];
    let count = selective_store_scalar(&a, &b, &idx, &mut expected).context("scalar selective store")?;
    let mismatches = selective_widths!(i32, &a, &b, &idx, expected, count, [2, 4, 8, 16]);
    report.record(round, "selective_store_32", 4 * len, mismatches);

    let a: Vec<i64> = (0..len).map(|_| rng.gen()).collect();
    let b: Vec<i64> = a
        .iter()
        .map(|&x| if rng.gen_bool(opt.mismatch_rate) { x ^ (rng.gen::<i64>() | 1) } else { x })
        .collect();
    let idx: Vec<i64> = (0..len).map(|_| rng.gen_range(0..len.max(1)) as i64).collect();
    let mut expected = vec![0i64; len];
    let count = selective_store_scalar(&a, &b, &idx, &mut expected).context("scalar selective store")?;
    let mismatches = selective_widths!(i64, &a, &b, &idx, expected, count, [1, 2, 4, 8]);
    report.record(round, "selective_store_64", 4 * len, mismatches);
    Ok(())
}

fn check_rearrange(
    rng: &mut StdRng,
    opt: &VerifyOpt,
    round: usize,
    report: &mut VerifyReport,
) -> Result<()> {
    const N: usize = 8;
    let cases = (opt.length / N).max(1);
    let mut mismatches = 0;
    for _ in 0..cases {
        let lanes: [i32; N] = rng.gen();
        let indexes: Vec<i64> = (0..N).map(|_| rng.gen_range(-(N as i64)..2 * N as i64)).collect();
        let v = Vector::<i32, N>::from_lanes(lanes);
        let shuffle = Shuffle::<i32, N>::from_values(&indexes)
            .context("random shuffle")?
            .with_policy(opt.policy);

        let mut expected = Some([0i32; N]);
        for (i, &index) in indexes.iter().enumerate() {
            let source = match opt.policy {
                _ if (0..N as i64).contains(&index) => Some(index as usize),
                ExceptionalIndex::Wrap => Some(index.rem_euclid(N as i64) as usize),
                ExceptionalIndex::Clamp => Some(index.clamp(0, N as i64 - 1) as usize),
                ExceptionalIndex::Zero => None,
                ExceptionalIndex::Fail => {
                    expected = None;
                    break;
                }
            };
            if let (Some(out), Some(j)) = (expected.as_mut(), source) {
                out[i] = lanes[j];
            }
        }

        let agrees = match (v.rearrange(&shuffle), expected) {
            (Ok(r), Some(e)) => r.to_array() == e,
            (Err(LaneError::OutOfBounds { .. }), None) => true,
            _ => false,
        };
        if !agrees {
            mismatches += 1;
        }
    }
    report.record(round, "rearrange", cases, mismatches);
    Ok(())
}

fn check_reductions(
    rng: &mut StdRng,
    opt: &VerifyOpt,
    round: usize,
    report: &mut VerifyReport,
) -> Result<()> {
    const N: usize = 8;
    let ops: [(ReductionOp, i64, fn(i64, i64) -> i64); 4] = [
        (ReductionOp::Add, 0, i64::wrapping_add),
        (ReductionOp::Xor, 0, |a, b| a ^ b),
        (ReductionOp::Min, i64::MAX, i64::min),
        (ReductionOp::Max, i64::MIN, i64::max),
    ];
    let cases = (opt.length / N).max(1);
    let mut mismatches = 0;
    for _ in 0..cases {
        let lanes: [i64; N] = rng.gen();
        let bits: u8 = rng.gen();
        let v = Vector::<i64, N>::from_lanes(lanes);
        let mask = LaneMask::<i64, N>::from_long(bits as u64);
        for (op, identity, fold) in ops {
            let all = lanes.iter().copied().fold(identity, fold);
            let selected = lanes
                .iter()
                .enumerate()
                .filter(|(i, _)| bits >> i & 1 == 1)
                .map(|(_, &x)| x)
                .fold(identity, fold);
            if v.reduce_lanes(op).context("reduction")? != all {
                mismatches += 1;
            }
            if v.reduce_lanes_masked(op, &mask).context("masked reduction")? != selected {
                mismatches += 1;
            }
        }
    }
    report.record(round, "reductions", 8 * cases, mismatches);
    Ok(())
}
