//! Readers and writers for the round's file artifacts.
//!
//! Every artifact shares the file stem given on the command line:
//!
//! | extension     | content                                            |
//! |---------------|----------------------------------------------------|
//! | `.attributes` | `cat <name>` / `bool <name>` declarations          |
//! | `.data`       | one point per line: location, bits, optional label |
//! | `.horn`       | premise indices, `=>`, conclusion index or `F`     |
//! | `.intervals`  | one `lo hi` pair per location                      |
//! | `.status`     | the round number                                   |
//! | `.R`          | one conjunction per location, `e` for empty        |
//! | `.W`          | one weight vector per location                     |
//!
//! Readers fail with [`ErrorKind::InvalidInput`][inv] chained with the file
//! and line of the offense. Writers truncate.
//!
//! [inv]: ../errors/enum.ErrorKind.html#variant.InvalidInput
//! (InvalidInput variant of the ErrorKind enum)

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::common::*;
use crate::data::{Attributes, Constraint, Data, DataPoint, Label};

/// Path of an artifact from the file stem.
pub fn artifact(stem: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}", stem, ext))
}

/// Opens an artifact for writing, truncating it.
pub fn create(path: &Path) -> Res<File> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
        .chain_err(|| format!("while creating `{}`", path.display()))
}

/// Non-empty trimmed lines of an artifact, with their 1-based line numbers.
fn lines(path: &Path) -> Res<Vec<(usize, String)>> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .chain_err(|| format!("while opening `{}`", path.display()))?;
    let mut res = vec![];
    for (off, line) in BufReader::new(file).lines().enumerate() {
        let line = line.chain_err(|| format!("while reading `{}`", path.display()))?;
        let line = line.trim();
        if !line.is_empty() {
            res.push((off + 1, line.to_string()))
        }
    }
    Ok(res)
}

/// Invalid-input error localized in an artifact.
fn local_err<S: ::std::fmt::Display>(path: &Path, line: usize, msg: S) -> Error {
    ErrorKind::InvalidInput(format!("`{}` line {}: {}", path.display(), line, msg)).into()
}

/// Reads the attribute metadata.
pub fn read_attributes(path: &Path) -> Res<Attributes> {
    let mut cat = None;
    let mut bools = PrdMap::new();
    for (num, line) in lines(path)? {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some("cat"), Some(name), None) => {
                if cat.is_some() {
                    return Err(local_err(path, num, "second category attribute"));
                }
                cat = Some(name.to_string())
            }
            (Some("bool"), Some(name), None) => {
                bools.push(name.to_string());
            }
            _ => return Err(local_err(path, num, "expected `cat <name>` or `bool <name>`")),
        }
    }
    let cat = match cat {
        Some(cat) => cat,
        None => {
            return Err(
                ErrorKind::InvalidInput(format!("`{}`: no category attribute", path.display()))
                    .into(),
            )
        }
    };
    if bools.is_empty() {
        bail!(ErrorKind::InvalidInput(format!(
            "`{}`: no attributes defined",
            path.display()
        )))
    }
    Ok(Attributes { cat, bools })
}

/// Reads the data points.
pub fn read_data(path: &Path, attrs: &Attributes) -> Res<PntMap<DataPoint>> {
    let prd_count = attrs.bools.len();
    let mut points = PntMap::new();
    for (num, line) in lines(path)? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 1 + prd_count || tokens.len() > 2 + prd_count {
            return Err(local_err(
                path,
                num,
                format!(
                    "expected a location, {} bits and an optional label, got {} tokens",
                    prd_count,
                    tokens.len()
                ),
            ));
        }
        let loc = tokens[0]
            .parse::<usize>()
            .map_err(|_| local_err(path, num, format!("illegal location `{}`", tokens[0])))?;
        let mut bits = Bits::with_capacity(prd_count);
        for token in &tokens[1..=prd_count] {
            match *token {
                "0" => bits.push(false),
                "1" => bits.push(true),
                _ => return Err(local_err(path, num, format!("illegal bit `{}`", token))),
            }
        }
        let label = match tokens.get(1 + prd_count) {
            None | Some(&"?") => Label::Unc,
            Some(&"+") => Label::Pos,
            Some(&"-") => Label::Neg,
            Some(token) => {
                return Err(local_err(path, num, format!("illegal label `{}`", token)))
            }
        };
        points.push(DataPoint::new(loc.into(), bits, label));
    }
    Ok(points)
}

/// Reads the Horn constraints.
pub fn read_horn(path: &Path, point_count: usize) -> Res<CstrMap<Constraint>> {
    let index = |num: usize, token: &str| -> Res<PntIdx> {
        let idx = token
            .parse::<usize>()
            .map_err(|_| local_err(path, num, format!("illegal point index `{}`", token)))?;
        if idx >= point_count {
            return Err(local_err(
                path,
                num,
                format!("point index {} out of the {} points", idx, point_count),
            ));
        }
        Ok(idx.into())
    };

    let mut constraints = CstrMap::new();
    for (num, line) in lines(path)? {
        let mut lhs = vec![];
        let mut tokens = line.split_whitespace();
        let rhs = loop {
            match tokens.next() {
                Some("=>") => match (tokens.next(), tokens.next()) {
                    (Some("F"), None) => break None,
                    (Some(token), None) => break Some(index(num, token)?),
                    _ => {
                        return Err(local_err(
                            path,
                            num,
                            "expected exactly one conclusion after `=>`",
                        ))
                    }
                },
                Some(token) => lhs.push(index(num, token)?),
                None => return Err(local_err(path, num, "missing `=>`")),
            }
        };
        constraints.push(Constraint::new(lhs, rhs));
    }
    Ok(constraints)
}

/// Reads the alphabet partition.
pub fn read_intervals(path: &Path) -> Res<LocMap<(PrdIdx, PrdIdx)>> {
    let mut intervals = LocMap::new();
    for (num, line) in lines(path)? {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [lo, hi] => {
                let parse = |token: &str| -> Res<PrdIdx> {
                    token
                        .parse::<usize>()
                        .map(Into::into)
                        .map_err(|_| local_err(path, num, format!("illegal bound `{}`", token)))
                };
                intervals.push((parse(lo)?, parse(hi)?));
            }
            _ => return Err(local_err(path, num, "expected a `lo hi` pair")),
        }
    }
    Ok(intervals)
}

/// Reads the round number.
pub fn read_status(path: &Path) -> Res<usize> {
    match lines(path)?.first() {
        Some((num, line)) => line
            .parse::<usize>()
            .map_err(|_| local_err(path, *num, format!("illegal round number `{}`", line))),
        None => bail!(ErrorKind::InvalidInput(format!(
            "`{}`: no round number",
            path.display()
        ))),
    }
}

/// Reads a persisted `R`.
pub fn read_r(path: &Path) -> Res<Hyp> {
    let mut hyp = Hyp::new();
    for (num, line) in lines(path)? {
        if line == "e" {
            hyp.push(Conj::new());
            continue;
        }
        let mut conj = Conj::new();
        for token in line.split_whitespace() {
            let prd = token
                .parse::<usize>()
                .map_err(|_| local_err(path, num, format!("illegal predicate `{}`", token)))?;
            conj.insert(prd.into());
        }
        hyp.push(conj);
    }
    Ok(hyp)
}

/// Writes `R`, one line per location, `e` for the empty conjunction.
pub fn write_r(path: &Path, hyp: &Hyp) -> Res<()> {
    let mut file = create(path)?;
    let mut line_pref = "";
    for conj in hyp {
        write!(file, "{}", line_pref).chain_err(|| format!("while writing `{}`", path.display()))?;
        line_pref = "\n";
        if conj.is_empty() {
            write!(file, "e").chain_err(|| format!("while writing `{}`", path.display()))?
        } else {
            let mut pref = "";
            for prd in conj {
                write!(file, "{}{}", pref, prd)
                    .chain_err(|| format!("while writing `{}`", path.display()))?;
                pref = " "
            }
        }
    }
    Ok(())
}

/// Reads persisted weight vectors.
pub fn read_w(path: &Path) -> Res<Vec<Vec<f64>>> {
    let mut rows = vec![];
    for (num, line) in lines(path)? {
        let mut row = vec![];
        for token in line.split_whitespace() {
            let weight = token
                .parse::<f64>()
                .map_err(|_| local_err(path, num, format!("illegal weight `{}`", token)))?;
            row.push(weight)
        }
        rows.push(row)
    }
    Ok(rows)
}

/// Writes weight vectors, one line per location.
pub fn write_w(path: &Path, rows: &[Vec<f64>]) -> Res<()> {
    let mut file = create(path)?;
    let mut line_pref = "";
    for row in rows {
        write!(file, "{}", line_pref).chain_err(|| format!("while writing `{}`", path.display()))?;
        line_pref = "\n";
        let mut pref = "";
        for weight in row {
            write!(file, "{}{}", pref, weight)
                .chain_err(|| format!("while writing `{}`", path.display()))?;
            pref = " "
        }
    }
    Ok(())
}

/// Reads the whole round input: attributes, points, constraints, intervals
/// and round number.
pub fn read_input(stem: &str) -> Res<(Data, usize)> {
    let attrs = read_attributes(&artifact(stem, "attributes"))?;
    let points = read_data(&artifact(stem, "data"), &attrs)?;
    let constraints = read_horn(&artifact(stem, "horn"), points.len())?;
    let intervals = read_intervals(&artifact(stem, "intervals"))?;
    let round = read_status(&artifact(stem, "status"))?;
    let data = Data::new(attrs, points, constraints, intervals)?;
    Ok((data, round))
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let mut path = ::std::env::temp_dir();
        path.push(format!("conch_parse_{}_{}", ::std::process::id(), name));
        path
    }

    #[test]
    fn r_round_trip() {
        let path = scratch("r_round_trip.R");
        let hyp: Hyp = vec![
            vec![0, 3].into_iter().map(PrdIdx::from).collect(),
            Conj::new(),
            vec![7].into_iter().map(PrdIdx::from).collect(),
        ]
        .into_iter()
        .collect();
        write_r(&path, &hyp).expect("while writing R");
        let back = read_r(&path).expect("while reading R");
        assert_eq!(hyp, back);
        let _ = ::std::fs::remove_file(&path);
    }

    #[test]
    fn w_round_trip() {
        let path = scratch("w_round_trip.W");
        let rows = vec![vec![0.8, 0.441, 2.4], vec![1.0, 0.020833333333333332]];
        write_w(&path, &rows).expect("while writing W");
        let back = read_w(&path).expect("while reading W");
        assert_eq!(rows, back);
        let _ = ::std::fs::remove_file(&path);
    }

    #[test]
    fn data_line_labels() {
        let path = scratch("labels.data");
        ::std::fs::write(&path, "0 1 0 +\n1 0 1 -\n0 1 1 ?\n1 1 1\n").expect("while writing data");
        let attrs = Attributes {
            cat: "$func".into(),
            bools: vec!["a".to_string(), "b".to_string()].into_iter().collect(),
        };
        let points = read_data(&path, &attrs).expect("while reading data");
        assert_eq!(points.len(), 4);
        assert!(points[PntIdx::from(0)].label.is_pos());
        assert!(points[PntIdx::from(1)].label.is_neg());
        assert!(points[PntIdx::from(2)].label.is_unc());
        assert!(points[PntIdx::from(3)].label.is_unc());
        let _ = ::std::fs::remove_file(&path);
    }

    #[test]
    fn horn_conclusions() {
        let path = scratch("conclusions.horn");
        ::std::fs::write(&path, "0 1 => 2\n0 => F\n=> 1\n").expect("while writing horn");
        let constraints = read_horn(&path, 3).expect("while reading horn");
        assert_eq!(constraints.len(), 3);
        assert_eq!(constraints[CstrIdx::from(0)].rhs, Some(PntIdx::from(2)));
        assert_eq!(constraints[CstrIdx::from(1)].rhs, None);
        assert!(constraints[CstrIdx::from(2)].lhs.is_empty());
        let _ = ::std::fs::remove_file(&path);
    }

    #[test]
    fn horn_rejects_dangling() {
        let path = scratch("dangling.horn");
        ::std::fs::write(&path, "0 => 7\n").expect("while writing horn");
        assert!(read_horn(&path, 3).is_err());
        let _ = ::std::fs::remove_file(&path);
    }
}
