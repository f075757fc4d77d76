//! Wire labels and the device context a QNode is bound to

use crate::error::{QinfoError, Result};
use std::fmt;

/// Label of a single wire: a plain index or a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireLabel {
    Index(usize),
    Name(String),
}

impl fmt::Display for WireLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireLabel::Index(i) => write!(f, "{}", i),
            WireLabel::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<usize> for WireLabel {
    fn from(index: usize) -> Self {
        WireLabel::Index(index)
    }
}

impl From<&str> for WireLabel {
    fn from(name: &str) -> Self {
        WireLabel::Name(name.to_string())
    }
}

impl From<String> for WireLabel {
    fn from(name: String) -> Self {
        WireLabel::Name(name)
    }
}

/// Ordered list of wire labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wires(Vec<WireLabel>);

impl Wires {
    pub fn new<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<WireLabel>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Wires `0..n`
    pub fn range(n: usize) -> Self {
        Self::new(0..n)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WireLabel> {
        self.0.iter()
    }

    pub fn labels(&self) -> &[WireLabel] {
        &self.0
    }
}

impl<L: Into<WireLabel>> FromIterator<L> for Wires {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<WireLabel>> for Wires {
    fn from(labels: Vec<WireLabel>) -> Self {
        Self(labels)
    }
}

impl From<&[usize]> for Wires {
    fn from(indices: &[usize]) -> Self {
        Self::new(indices.iter().copied())
    }
}

impl<const N: usize> From<[usize; N]> for Wires {
    fn from(indices: [usize; N]) -> Self {
        Self::new(indices)
    }
}

impl fmt::Display for Wires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", label)?;
        }
        write!(f, "]")
    }
}

/// Register a state function runs on
///
/// The position of a label in `wires` is the qubit it addresses in the
/// state the function returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    wires: Wires,
}

impl Device {
    /// Device with wires labelled `0..num_wires`
    pub fn new(num_wires: usize) -> Self {
        Self {
            wires: Wires::range(num_wires),
        }
    }

    /// Device with custom labels, which must be unique
    pub fn with_wires(wires: impl Into<Wires>) -> Result<Self> {
        let wires = wires.into();
        for (i, label) in wires.labels().iter().enumerate() {
            if wires.labels()[..i].contains(label) {
                return Err(QinfoError::DuplicateWire {
                    wire: label.to_string(),
                });
            }
        }
        Ok(Self { wires })
    }

    pub fn wires(&self) -> &Wires {
        &self.wires
    }

    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    pub fn position(&self, label: &WireLabel) -> Result<usize> {
        self.wires
            .iter()
            .position(|w| w == label)
            .ok_or_else(|| QinfoError::UnknownWire {
                wire: label.to_string(),
            })
    }

    /// Map a non-empty subset of labels to qubit positions, preserving order
    pub fn positions(&self, subset: &Wires) -> Result<Vec<usize>> {
        if subset.is_empty() {
            return Err(QinfoError::EmptyWires);
        }

        let mut positions = Vec::with_capacity(subset.len());
        for label in subset.iter() {
            let position = self.position(label)?;
            if positions.contains(&position) {
                return Err(QinfoError::DuplicateWire {
                    wire: label.to_string(),
                });
            }
            positions.push(position);
        }
        Ok(positions)
    }
}
