//! Writes `sample_reference.fasta` and `sample_metadata.tsv` to the current
//! directory for trying out the GUI and the `export` command.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `lo..hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo)
    }
}

fn random_sequence(len: usize, rng: &mut SimpleRng) -> String {
    (0..len)
        .map(|_| b"ACGT"[rng.range(0, 4) as usize] as char)
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Amplicon targets named after their Pf3D7 chromosome and coordinates.
    let mut asvs: Vec<(String, String)> = Vec::new();
    for chrom in 1..=14u64 {
        let start = rng.range(100_000, 1_500_000);
        let len = rng.range(180, 300);
        let name = format!("Pf3D7_{chrom:02}_v3-{start}-{}-1A", start + len);
        asvs.push((name, random_sequence(len as usize, &mut rng)));
    }

    let fasta_path = "sample_reference.fasta";
    let mut fasta = BufWriter::new(File::create(fasta_path).context("creating FASTA")?);
    for (name, seq) in &asvs {
        writeln!(fasta, ">{name} sample reference")?;
        for line in seq.as_bytes().chunks(60) {
            fasta.write_all(line)?;
            fasta.write_all(b"\n")?;
        }
    }
    // A truncated duplicate: loaders keep the longer copy above.
    let (dup_name, dup_seq) = &asvs[0];
    writeln!(fasta, ">{dup_name} truncated\n{}", &dup_seq[..dup_seq.len() / 2])?;
    fasta.flush()?;

    let timepoints = ["2023-01-15", "2023-04-15", "2023-07-15", "2023-10-15"];
    let samples: Vec<String> = (1..=24).map(|i| format!("S{i}")).collect();

    let meta_path = "sample_metadata.tsv";
    let mut meta = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(meta_path)
        .context("creating metadata")?;
    meta.write_record(["sample", "ASV", "timestamp", "reads"])?;

    let mut rows = 0;
    for sample in &samples {
        let timestamp = timepoints[rng.range(0, timepoints.len() as u64) as usize];
        for (name, _) in &asvs {
            // Roughly a third of the targets drop out per sample.
            if rng.range(0, 3) == 0 {
                continue;
            }
            let reads = rng.range(5, 5_000).to_string();
            meta.write_record([sample.as_str(), name.as_str(), timestamp, reads.as_str()])?;
            rows += 1;
        }
    }
    meta.flush()?;

    println!(
        "Wrote {} ASVs to {fasta_path} and {rows} rows ({} timepoints) to {meta_path}",
        asvs.len(),
        timepoints.len()
    );
    Ok(())
}
