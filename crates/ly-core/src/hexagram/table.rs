//! The 64-hexagram catalogue in King Wen order.
//!
//! Encodings are written bottom line first, so `"100000"` is 复 (Return):
//! a single yang line under five yin lines. The reverse index is built at
//! compile time and the build fails if two entries share a pattern or the
//! numbering is out of order.

use super::{Hexagram, Pattern};

const fn encoding_bits(encoding: &str) -> u8 {
    let bytes = encoding.as_bytes();
    assert!(bytes.len() == 6, "hexagram encoding must be 6 characters");
    let mut bits = 0u8;
    let mut i = 0;
    while i < 6 {
        match bytes[i] {
            b'1' => bits |= 1 << i,
            b'0' => {}
            _ => panic!("hexagram encoding must be 0/1"),
        }
        i += 1;
    }
    bits
}

const fn entry(
    number: u8,
    encoding: &str,
    name: &'static str,
    short_name: &'static str,
    pinyin: &'static str,
    english: &'static str,
) -> Hexagram {
    Hexagram {
        number,
        pattern: Pattern::from_bits(encoding_bits(encoding)),
        name,
        short_name,
        pinyin,
        english,
    }
}

const fn build_index(table: &[Hexagram; 64]) -> [u8; 64] {
    let mut index = [u8::MAX; 64];
    let mut i = 0;
    while i < 64 {
        let hexagram = &table[i];
        assert!(
            hexagram.number as usize == i + 1,
            "hexagram table must be in King Wen order"
        );
        let slot = hexagram.pattern.bits() as usize;
        assert!(index[slot] == u8::MAX, "duplicate hexagram pattern");
        index[slot] = i as u8;
        i += 1;
    }
    index
}

/// Position in [`HEXAGRAMS`] for each 6-bit pattern.
pub(super) static BY_PATTERN: [u8; 64] = build_index(&TABLE);

/// All 64 hexagrams, index `n - 1` holding King Wen number `n`.
pub(super) static HEXAGRAMS: [Hexagram; 64] = TABLE;

#[rustfmt::skip]
const TABLE: [Hexagram; 64] = [
    entry(1, "111111", "乾为天", "乾", "Qian", "The Creative"),
    entry(2, "000000", "坤为地", "坤", "Kun", "The Receptive"),
    entry(3, "100010", "水雷屯", "屯", "Zhun", "Difficulty at the Beginning"),
    entry(4, "010001", "山水蒙", "蒙", "Meng", "Youthful Folly"),
    entry(5, "111010", "水天需", "需", "Xu", "Waiting"),
    entry(6, "010111", "天水讼", "讼", "Song", "Conflict"),
    entry(7, "010000", "地水师", "师", "Shi", "The Army"),
    entry(8, "000010", "水地比", "比", "Bi", "Holding Together"),
    entry(9, "111011", "风天小畜", "小畜", "Xiao Xu", "Small Taming"),
    entry(10, "110111", "天泽履", "履", "Lu", "Treading"),
    entry(11, "111000", "地天泰", "泰", "Tai", "Peace"),
    entry(12, "000111", "天地否", "否", "Pi", "Standstill"),
    entry(13, "101111", "天火同人", "同人", "Tong Ren", "Fellowship"),
    entry(14, "111101", "火天大有", "大有", "Da You", "Great Possession"),
    entry(15, "001000", "地山谦", "谦", "Qian", "Modesty"),
    entry(16, "000100", "雷地豫", "豫", "Yu", "Enthusiasm"),
    entry(17, "100110", "泽雷随", "随", "Sui", "Following"),
    entry(18, "011001", "山风蛊", "蛊", "Gu", "Work on the Decayed"),
    entry(19, "110000", "地泽临", "临", "Lin", "Approach"),
    entry(20, "000011", "风地观", "观", "Guan", "Contemplation"),
    entry(21, "100101", "火雷噬嗑", "噬嗑", "Shi He", "Biting Through"),
    entry(22, "101001", "山火贲", "贲", "Bi", "Grace"),
    entry(23, "000001", "山地剥", "剥", "Bo", "Splitting Apart"),
    entry(24, "100000", "地雷复", "复", "Fu", "Return"),
    entry(25, "100111", "天雷无妄", "无妄", "Wu Wang", "Innocence"),
    entry(26, "111001", "山天大畜", "大畜", "Da Xu", "Great Taming"),
    entry(27, "100001", "山雷颐", "颐", "Yi", "Nourishment"),
    entry(28, "011110", "泽风大过", "大过", "Da Guo", "Great Exceeding"),
    entry(29, "010010", "坎为水", "坎", "Kan", "The Abysmal"),
    entry(30, "101101", "离为火", "离", "Li", "The Clinging"),
    entry(31, "001110", "泽山咸", "咸", "Xian", "Influence"),
    entry(32, "011100", "雷风恒", "恒", "Heng", "Duration"),
    entry(33, "001111", "天山遁", "遁", "Dun", "Retreat"),
    entry(34, "111100", "雷天大壮", "大壮", "Da Zhuang", "Great Power"),
    entry(35, "000101", "火地晋", "晋", "Jin", "Progress"),
    entry(36, "101000", "地火明夷", "明夷", "Ming Yi", "Darkening of the Light"),
    entry(37, "101011", "风火家人", "家人", "Jia Ren", "The Family"),
    entry(38, "110101", "火泽睽", "睽", "Kui", "Opposition"),
    entry(39, "001010", "水山蹇", "蹇", "Jian", "Obstruction"),
    entry(40, "010100", "雷水解", "解", "Xie", "Deliverance"),
    entry(41, "110001", "山泽损", "损", "Sun", "Decrease"),
    entry(42, "100011", "风雷益", "益", "Yi", "Increase"),
    entry(43, "111110", "泽天夬", "夬", "Guai", "Breakthrough"),
    entry(44, "011111", "天风姤", "姤", "Gou", "Coming to Meet"),
    entry(45, "000110", "泽地萃", "萃", "Cui", "Gathering Together"),
    entry(46, "011000", "地风升", "升", "Sheng", "Pushing Upward"),
    entry(47, "010110", "泽水困", "困", "Kun", "Oppression"),
    entry(48, "011010", "水风井", "井", "Jing", "The Well"),
    entry(49, "101110", "泽火革", "革", "Ge", "Revolution"),
    entry(50, "011101", "火风鼎", "鼎", "Ding", "The Cauldron"),
    entry(51, "100100", "震为雷", "震", "Zhen", "The Arousing"),
    entry(52, "001001", "艮为山", "艮", "Gen", "Keeping Still"),
    entry(53, "001011", "风山渐", "渐", "Jian", "Development"),
    entry(54, "110100", "雷泽归妹", "归妹", "Gui Mei", "The Marrying Maiden"),
    entry(55, "101100", "雷火丰", "丰", "Feng", "Abundance"),
    entry(56, "001101", "火山旅", "旅", "Lu", "The Wanderer"),
    entry(57, "011011", "巽为风", "巽", "Xun", "The Gentle"),
    entry(58, "110110", "兑为泽", "兑", "Dui", "The Joyous"),
    entry(59, "010011", "风水涣", "涣", "Huan", "Dispersion"),
    entry(60, "110010", "水泽节", "节", "Jie", "Limitation"),
    entry(61, "110011", "风泽中孚", "中孚", "Zhong Fu", "Inner Truth"),
    entry(62, "001100", "雷山小过", "小过", "Xiao Guo", "Small Exceeding"),
    entry(63, "101010", "水火既济", "既济", "Ji Ji", "After Completion"),
    entry(64, "010101", "火水未济", "未济", "Wei Ji", "Before Completion"),
];
