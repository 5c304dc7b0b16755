//! Rhythm syllables.

use std::fmt::{self, Display, Formatter};


/// A bol, one syllable of tabla notation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Bol {
    /// Rest.
    Empty,

    Na,
    Ti,
    Ta,
    Tin,

    Ke,
    Ge,
    Dha,
    Dhin,
    Dhet,

    Kre,
    Tet,
}

impl Bol {
    /// Every bol, in declaration order.
    pub const ALL: [Bol; 12] = [
        Bol::Empty,
        Bol::Na,
        Bol::Ti,
        Bol::Ta,
        Bol::Tin,
        Bol::Ke,
        Bol::Ge,
        Bol::Dha,
        Bol::Dhin,
        Bol::Dhet,
        Bol::Kre,
        Bol::Tet,
    ];

    /// Text drawn as the bol's label.
    pub fn as_str(self) -> &'static str {
        match self {
            Bol::Empty => "-",
            Bol::Na => "NA",
            Bol::Ti => "TI",
            Bol::Ta => "TA",
            Bol::Tin => "TIN",
            Bol::Ke => "KE",
            Bol::Ge => "GE",
            Bol::Dha => "DHA",
            Bol::Dhin => "DHIN",
            Bol::Dhet => "DHET",
            Bol::Kre => "KRE",
            Bol::Tet => "TET",
        }
    }
}

impl Display for Bol {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_bol_has_a_distinct_label() {
        let labels = Bol::ALL
            .iter()
            .map(|bol| bol.as_str())
            .collect::<HashSet<_>>();
        assert_eq!(labels.len(), Bol::ALL.len());
        assert!(labels.iter().all(|label| !label.is_empty()));
    }

    #[test]
    fn labels_match_notation() {
        assert_eq!(Bol::Empty.as_str(), "-");
        assert_eq!(Bol::Dhin.to_string(), "DHIN");
        assert_eq!(Bol::Kre.as_str(), "KRE");
    }
}
