//! ASTC quantization methods and their bounded integer sequence encodings.

/// One of the 21 value ranges ASTC can store, from 2 to 256 levels.
///
/// The discriminant is the index used by the ASTC block-mode tables and by the
/// GPU search stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum QuantMethod {
    Quant2 = 0,
    Quant3 = 1,
    Quant4 = 2,
    Quant5 = 3,
    Quant6 = 4,
    Quant8 = 5,
    Quant10 = 6,
    Quant12 = 7,
    Quant16 = 8,
    Quant20 = 9,
    Quant24 = 10,
    Quant32 = 11,
    Quant40 = 12,
    Quant48 = 13,
    Quant64 = 14,
    Quant80 = 15,
    Quant96 = 16,
    Quant128 = 17,
    Quant160 = 18,
    Quant192 = 19,
    Quant256 = 20,
}

pub const QUANT_LEVELS: usize = 21;

impl QuantMethod {
    #[rustfmt::skip]
    pub const ALL: [QuantMethod; QUANT_LEVELS] = [
        QuantMethod::Quant2, QuantMethod::Quant3, QuantMethod::Quant4,
        QuantMethod::Quant5, QuantMethod::Quant6, QuantMethod::Quant8,
        QuantMethod::Quant10, QuantMethod::Quant12, QuantMethod::Quant16,
        QuantMethod::Quant20, QuantMethod::Quant24, QuantMethod::Quant32,
        QuantMethod::Quant40, QuantMethod::Quant48, QuantMethod::Quant64,
        QuantMethod::Quant80, QuantMethod::Quant96, QuantMethod::Quant128,
        QuantMethod::Quant160, QuantMethod::Quant192, QuantMethod::Quant256,
    ];

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of distinct values representable at this precision.
    pub fn levels(self) -> u32 {
        let counts = self.bise_counts();
        (1 << counts.bits) * if counts.trits > 0 { 3 } else if counts.quints > 0 { 5 } else { 1 }
    }

    pub fn bise_counts(self) -> BiseCounts {
        BISE_RANGES[self.index()]
    }

    /// Size in bits of a sequence of `count` values at this precision.
    pub fn ise_bitcount(self, count: u32) -> u32 {
        crate::ise::ise_sequence_bitcount(count, self as u32)
    }
}

/// Decomposition of a level count into plain bits and at most one trit or quint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BiseCounts {
    pub bits: u8,
    pub trits: u8,
    pub quints: u8,
}

#[rustfmt::skip]
static BISE_RANGES: [BiseCounts; QUANT_LEVELS] = [
    BiseCounts { bits: 1, trits: 0, quints: 0 }, // QUANT_2
    BiseCounts { bits: 0, trits: 1, quints: 0 }, // QUANT_3
    BiseCounts { bits: 2, trits: 0, quints: 0 }, // QUANT_4
    BiseCounts { bits: 0, trits: 0, quints: 1 }, // QUANT_5
    BiseCounts { bits: 1, trits: 1, quints: 0 }, // QUANT_6
    BiseCounts { bits: 3, trits: 0, quints: 0 }, // QUANT_8
    BiseCounts { bits: 1, trits: 0, quints: 1 }, // QUANT_10
    BiseCounts { bits: 2, trits: 1, quints: 0 }, // QUANT_12
    BiseCounts { bits: 4, trits: 0, quints: 0 }, // QUANT_16
    BiseCounts { bits: 2, trits: 0, quints: 1 }, // QUANT_20
    BiseCounts { bits: 3, trits: 1, quints: 0 }, // QUANT_24
    BiseCounts { bits: 5, trits: 0, quints: 0 }, // QUANT_32
    BiseCounts { bits: 3, trits: 0, quints: 1 }, // QUANT_40
    BiseCounts { bits: 4, trits: 1, quints: 0 }, // QUANT_48
    BiseCounts { bits: 6, trits: 0, quints: 0 }, // QUANT_64
    BiseCounts { bits: 4, trits: 0, quints: 1 }, // QUANT_80
    BiseCounts { bits: 5, trits: 1, quints: 0 }, // QUANT_96
    BiseCounts { bits: 7, trits: 0, quints: 0 }, // QUANT_128
    BiseCounts { bits: 5, trits: 0, quints: 1 }, // QUANT_160
    BiseCounts { bits: 6, trits: 1, quints: 0 }, // QUANT_192
    BiseCounts { bits: 8, trits: 0, quints: 0 }, // QUANT_256
];
