use anyhow::{anyhow, Context, Result};
use std::fmt::Display;

/// The parameters of a balanced incomplete block design.
///
/// A design with `n` vertices, block size `k` and index `λ` is a collection of `c` blocks (the classes)
/// of `k` vertices each, such that every pair of distinct vertices is contained in exactly `λ` blocks.
/// Each vertex then belongs to exactly `r` blocks.
/// The derived values are `c = λ·n·(n-1) / (k·(k-1))` and `r = λ·(n-1) / (k-1)`.
///
/// # Example
///
/// ```
/// # use lexbibd::designs::DesignInstance;
/// let fano = DesignInstance::new(7, 3, 1).unwrap();
/// assert_eq!(7, fano.n_classes());
/// assert_eq!(3, fano.replication());
/// assert!(DesignInstance::new(6, 3, 1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignInstance {
    n_vertices: usize,
    block_size: usize,
    lambda: usize,
    n_classes: usize,
    replication: usize,
}

impl DesignInstance {
    /// Checks the parameters of a design and computes its derived values.
    ///
    /// An error is returned if `n < 2`, `k < 2`, `k > n`, `λ < 1`,
    /// or if the number of classes or the replication number is not an integer.
    pub fn new(n_vertices: usize, block_size: usize, lambda: usize) -> Result<Self> {
        if n_vertices < 2 {
            return Err(anyhow!(
                "a design needs at least 2 vertices (got {})",
                n_vertices
            ));
        }
        if block_size < 2 || block_size > n_vertices {
            return Err(anyhow!(
                "the block size must be between 2 and the number of vertices (got {} for {} vertices)",
                block_size,
                n_vertices
            ));
        }
        if lambda < 1 {
            return Err(anyhow!("the index of a design must be positive"));
        }
        let replication_num = lambda * (n_vertices - 1);
        if replication_num % (block_size - 1) != 0 {
            return Err(anyhow!(
                "no ({},{},{}) design exists: the replication number {}/{} is not an integer",
                n_vertices,
                block_size,
                lambda,
                replication_num,
                block_size - 1
            ));
        }
        let classes_num = lambda * n_vertices * (n_vertices - 1);
        let classes_den = block_size * (block_size - 1);
        if classes_num % classes_den != 0 {
            return Err(anyhow!(
                "no ({},{},{}) design exists: the number of classes {}/{} is not an integer",
                n_vertices,
                block_size,
                lambda,
                classes_num,
                classes_den
            ));
        }
        Ok(Self {
            n_vertices,
            block_size,
            lambda,
            n_classes: classes_num / classes_den,
            replication: replication_num / (block_size - 1),
        })
    }

    /// The number of vertices (`n`).
    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// The number of vertices in each class (`k`).
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The number of classes containing each pair of vertices (`λ`).
    pub fn lambda(&self) -> usize {
        self.lambda
    }

    /// The number of classes (`c`).
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// The number of classes containing each vertex (`r`).
    pub fn replication(&self) -> usize {
        self.replication
    }
}

impl TryFrom<&str> for DesignInstance {
    type Error = anyhow::Error;

    /// Reads an instance written `n,k,λ`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let context = || format!(r#"while reading design parameters "{}""#, value);
        let params = value
            .split(',')
            .map(|w| {
                w.trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow!(r#""{}" is not a non-negative integer"#, w.trim()))
            })
            .collect::<Result<Vec<usize>>>()
            .with_context(context)?;
        match params.as_slice() {
            [n, k, lambda] => DesignInstance::new(*n, *k, *lambda).with_context(context),
            _ => Err(anyhow!("expected 3 comma-separated values")).with_context(context),
        }
    }
}

impl Display for DesignInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.n_vertices, self.block_size, self.lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fano() {
        let instance = DesignInstance::new(7, 3, 1).unwrap();
        assert_eq!(7, instance.n_vertices());
        assert_eq!(3, instance.block_size());
        assert_eq!(1, instance.lambda());
        assert_eq!(7, instance.n_classes());
        assert_eq!(3, instance.replication());
        assert_eq!("(7,3,1)", instance.to_string());
    }

    #[test]
    fn test_derived_values() {
        let instance = DesignInstance::new(4, 2, 1).unwrap();
        assert_eq!(6, instance.n_classes());
        assert_eq!(3, instance.replication());
        let instance = DesignInstance::new(6, 3, 2).unwrap();
        assert_eq!(10, instance.n_classes());
        assert_eq!(5, instance.replication());
        let instance = DesignInstance::new(3, 3, 2).unwrap();
        assert_eq!(2, instance.n_classes());
        assert_eq!(2, instance.replication());
    }

    #[test]
    fn test_non_integral() {
        assert!(DesignInstance::new(6, 3, 1).is_err());
        assert!(DesignInstance::new(8, 3, 1).is_err());
    }

    #[test]
    fn test_out_of_range() {
        assert!(DesignInstance::new(1, 1, 1).is_err());
        assert!(DesignInstance::new(7, 1, 1).is_err());
        assert!(DesignInstance::new(7, 8, 1).is_err());
        assert!(DesignInstance::new(7, 3, 0).is_err());
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(
            DesignInstance::new(7, 3, 1).unwrap(),
            DesignInstance::try_from("7,3,1").unwrap()
        );
        assert_eq!(
            DesignInstance::new(4, 2, 1).unwrap(),
            DesignInstance::try_from(" 4, 2 ,1").unwrap()
        );
        assert!(DesignInstance::try_from("7,3").is_err());
        assert!(DesignInstance::try_from("7,3,1,1").is_err());
        assert!(DesignInstance::try_from("7,three,1").is_err());
        assert!(DesignInstance::try_from("6,3,1").is_err());
    }
}
