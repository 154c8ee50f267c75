use std::borrow::Cow;

/// Lower-cases `input`, then capitalizes the first character of every
/// whitespace-delimited word. Whitespace is preserved as-is.
pub fn full_name(input: &str) -> Cow<'_, str> {
    let mut output = String::with_capacity(input.len());
    let mut word_start = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            output.push(ch);
            word_start = true;
        } else if word_start {
            let mut lowered = ch.to_lowercase();
            if let Some(first) = lowered.next() {
                output.push(capitalize(first));
            }
            output.extend(lowered);
            word_start = false;
        } else {
            output.extend(ch.to_lowercase());
        }
    }
    if output == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(output)
    }
}

// Characters whose upper case is several characters (`ß`) stay as they are.
fn capitalize(ch: char) -> char {
    let mut upper = ch.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => ch,
    }
}

pub fn unmodified(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input)
}
