use eyre::{bail, ensure, Result};

pub fn id(id: &str) -> Result<()> {
    ensure!(
        id.split_whitespace().next().is_some(),
        "FASTA ID cannot be empty"
    );
    ensure!(
        !id.contains(&['\n', '\r'] as &[char]),
        "Newline characters are not allowed in the FASTA ID: {id}"
    );
    Ok(())
}

/// Residues are opaque bytes, only line breaks are rejected.
pub fn seq(seq: &[u8]) -> Result<()> {
    if let Some(i) = seq.iter().position(|&x| x == b'\n' || x == b'\r') {
        bail!("Line break in the FASTA sequence at index {i}");
    }
    Ok(())
}
