//! A minimal multipart splitter, only good enough to check the encoder output.
#![allow(dead_code)]

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPart {
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    (0..haystack.len() - needle.len() + 1)
        .find(|&idx| &haystack[idx..idx + needle.len()] == needle)
}

/// splits `data` into its parts, panics if `data` is not a valid multipart body
pub fn split_multipart(data: &[u8], boundary: &str) -> Vec<DecodedPart> {
    let delimiter = format!("\r\n--{}", boundary).into_bytes();

    // the first delimiter can be at the very start, i.e. without the CRLF
    let mut rest = Vec::with_capacity(data.len() + 2);
    rest.extend_from_slice(b"\r\n");
    rest.extend_from_slice(data);
    let mut rest: &[u8] = &rest;

    let start = find(rest, &delimiter).expect("no delimiter found");
    rest = &rest[start + delimiter.len()..];

    let mut parts = Vec::new();
    loop {
        if rest.starts_with(b"--") {
            assert_eq!(&rest[2..], b"", "data after the closing delimiter");
            return parts;
        }
        assert!(rest.starts_with(b"\r\n"), "delimiter not followed by CRLF");
        rest = &rest[2..];

        let end = find(rest, &delimiter).expect("closing delimiter missing");
        parts.push(parse_part(&rest[..end]));
        rest = &rest[end + delimiter.len()..];
    }
}

fn parse_part(raw: &[u8]) -> DecodedPart {
    let (head, body) = if raw.starts_with(b"\r\n") {
        (&raw[..0], &raw[2..])
    } else {
        let end = find(raw, b"\r\n\r\n").expect("header block not terminated");
        (&raw[..end], &raw[end + 4..])
    };

    let head = ::std::str::from_utf8(head).expect("non utf8 headers");
    let headers = head.split("\r\n")
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut split = line.splitn(2, ": ");
            let name = split.next().unwrap().to_owned();
            let value = split.next().expect("header line without \": \"").to_owned();
            (name, value)
        })
        .collect();

    DecodedPart { headers, body: body.to_vec() }
}
