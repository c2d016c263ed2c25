//! Character-level Unicode classification and width/script conversion for
//! Japanese text.

pub fn is_hiragana(c: char) -> bool {
    ('\u{3040}'..='\u{309F}').contains(&c)
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{20000}'..='\u{2A6DF}').contains(&c)
}

/// ASCII punctuation, CJK symbols and punctuation (、。「」…), the katakana
/// middle dot, and fullwidth/halfwidth punctuation forms.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || ('\u{3000}'..='\u{303F}').contains(&c)
        || c == '・'
        || ('\u{FF01}'..='\u{FF0F}').contains(&c)
        || ('\u{FF1A}'..='\u{FF20}').contains(&c)
        || ('\u{FF3B}'..='\u{FF40}').contains(&c)
        || ('\u{FF5B}'..='\u{FF65}').contains(&c)
}

pub fn contains_punctuation(s: &str) -> bool {
    s.chars().any(is_punctuation)
}

/// Check if a string is a valid hiragana reading.
///
/// Accepts hiragana characters (U+3040..U+309F) and the prolonged sound mark
/// ー (U+30FC, technically katakana) which commonly appears in readings like
/// "らーめん".
pub fn is_hiragana_reading(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| is_hiragana(c) || c == 'ー')
}

// --- Conversion ---

pub fn wide_latin_char(c: char) -> char {
    match c {
        ' ' => '\u{3000}',
        '\u{00A5}' => '\u{FFE5}',
        '\u{21}'..='\u{7E}' => char::from_u32(c as u32 - 0x20 + 0xFF00).unwrap_or(c),
        _ => c,
    }
}

/// Printable ASCII to the fullwidth block, space to the ideographic space.
pub fn to_wide_latin(s: &str) -> String {
    s.chars().map(wide_latin_char).collect()
}

pub fn wide_katakana_char(c: char) -> char {
    match c {
        'ぁ'..='ゖ' => char::from_u32(c as u32 - 'ぁ' as u32 + 'ァ' as u32).unwrap_or(c),
        _ => c,
    }
}

/// Hiragana to fullwidth katakana; everything else is left alone.
pub fn to_wide_katakana(s: &str) -> String {
    s.chars().map(wide_katakana_char).collect()
}

/// Half-width form of a hiragana or symbol, if one exists.
///
/// Voiced and semi-voiced kana map to two code points (base + mark).
pub fn half_katakana(c: char) -> Option<&'static str> {
    HALF_KATAKANA
        .binary_search_by_key(&c, |&(k, _)| k)
        .ok()
        .map(|i| HALF_KATAKANA[i].1)
}

/// Hiragana to half-width katakana; unmapped characters pass through.
pub fn to_half_katakana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match half_katakana(c) {
            Some(half) => out.push_str(half),
            None => out.push(c),
        }
    }
    out
}

/// Sorted by source character for binary search.
static HALF_KATAKANA: &[(char, &str)] = &[
    ('、', "､"),
    ('。', "｡"),
    ('「', "｢"),
    ('」', "｣"),
    ('ぁ', "ｧ"),
    ('あ', "ｱ"),
    ('ぃ', "ｨ"),
    ('い', "ｲ"),
    ('ぅ', "ｩ"),
    ('う', "ｳ"),
    ('ぇ', "ｪ"),
    ('え', "ｴ"),
    ('ぉ', "ｫ"),
    ('お', "ｵ"),
    ('か', "ｶ"),
    ('が', "ｶﾞ"),
    ('き', "ｷ"),
    ('ぎ', "ｷﾞ"),
    ('く', "ｸ"),
    ('ぐ', "ｸﾞ"),
    ('け', "ｹ"),
    ('げ', "ｹﾞ"),
    ('こ', "ｺ"),
    ('ご', "ｺﾞ"),
    ('さ', "ｻ"),
    ('ざ', "ｻﾞ"),
    ('し', "ｼ"),
    ('じ', "ｼﾞ"),
    ('す', "ｽ"),
    ('ず', "ｽﾞ"),
    ('せ', "ｾ"),
    ('ぜ', "ｾﾞ"),
    ('そ', "ｿ"),
    ('ぞ', "ｿﾞ"),
    ('た', "ﾀ"),
    ('だ', "ﾀﾞ"),
    ('ち', "ﾁ"),
    ('ぢ', "ﾁﾞ"),
    ('っ', "ｯ"),
    ('つ', "ﾂ"),
    ('づ', "ﾂﾞ"),
    ('て', "ﾃ"),
    ('で', "ﾃﾞ"),
    ('と', "ﾄ"),
    ('ど', "ﾄﾞ"),
    ('な', "ﾅ"),
    ('に', "ﾆ"),
    ('ぬ', "ﾇ"),
    ('ね', "ﾈ"),
    ('の', "ﾉ"),
    ('は', "ﾊ"),
    ('ば', "ﾊﾞ"),
    ('ぱ', "ﾊﾟ"),
    ('ひ', "ﾋ"),
    ('び', "ﾋﾞ"),
    ('ぴ', "ﾋﾟ"),
    ('ふ', "ﾌ"),
    ('ぶ', "ﾌﾞ"),
    ('ぷ', "ﾌﾟ"),
    ('へ', "ﾍ"),
    ('べ', "ﾍﾞ"),
    ('ぺ', "ﾍﾟ"),
    ('ほ', "ﾎ"),
    ('ぼ', "ﾎﾞ"),
    ('ぽ', "ﾎﾟ"),
    ('ま', "ﾏ"),
    ('み', "ﾐ"),
    ('む', "ﾑ"),
    ('め', "ﾒ"),
    ('も', "ﾓ"),
    ('ゃ', "ｬ"),
    ('や', "ﾔ"),
    ('ゅ', "ｭ"),
    ('ゆ', "ﾕ"),
    ('ょ', "ｮ"),
    ('よ', "ﾖ"),
    ('ら', "ﾗ"),
    ('り', "ﾘ"),
    ('る', "ﾙ"),
    ('れ', "ﾚ"),
    ('ろ', "ﾛ"),
    ('わ', "ﾜ"),
    ('を', "ｦ"),
    ('ん', "ﾝ"),
    ('ゔ', "ｳﾞ"),
    ('゛', "ﾞ"),
    ('゜', "ﾟ"),
    ('・', "･"),
    ('ー', "ｰ"),
];
