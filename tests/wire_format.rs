extern crate multipart_pull;
extern crate rand;

mod utils;

use std::io::{self, Read};

use rand::SeedableRng;
use rand::rngs::StdRng;

use multipart_pull::{
    Encoder, MultipartReader, MultipartError,
    Part, PartSource, BoxPartSource, source
};

use utils::split_multipart;


/// the part source of the canonical three part example
struct Counting {
    count: usize,
    limit: usize
}

impl PartSource for Counting {
    fn next_part(&mut self) -> io::Result<Option<Part>> {
        if self.count >= self.limit {
            return Ok(None);
        }
        let idx = self.count;
        self.count += 1;
        let part = Part::from_bytes(format!("Hello {}", idx))
            .with_header("Content-Disposition", format!("form-data; name=\"File{}\"", idx))
            .with_header("Custom-Header", format!("{}", idx));
        Ok(Some(part))
    }
}

fn counting(limit: usize) -> Counting {
    Counting { count: 0, limit }
}

fn read_with_buf_size<R: Read>(reader: &mut R, size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; size];
    loop {
        let count = reader.read(&mut buf).unwrap();
        if count == 0 {
            return out;
        }
        out.extend_from_slice(&buf[..count]);
    }
}

const EXPECTED: &str = concat!(
    "--TestBoundary\r\nContent-Disposition: form-data; name=\"File0\"\r\nCustom-Header: 0\r\n\r\n",
    "Hello 0",
    "\r\n--TestBoundary\r\nContent-Disposition: form-data; name=\"File1\"\r\nCustom-Header: 1\r\n\r\n",
    "Hello 1",
    "\r\n--TestBoundary\r\nContent-Disposition: form-data; name=\"File2\"\r\nCustom-Header: 2\r\n\r\n",
    "Hello 2",
    "\r\n--TestBoundary--"
);

#[test]
fn three_parts_produce_the_exact_bytes() {
    let mut reader = MultipartReader::new(counting(3)).with_boundary("TestBoundary");

    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();

    assert_eq!(out, EXPECTED);
    assert_eq!(reader.written_parts(), 3);
}

#[test]
fn output_can_be_split_into_the_parts() {
    let mut reader = MultipartReader::new(counting(3)).with_boundary("TestBoundary");
    let out = read_with_buf_size(&mut reader, 4096);

    let parts = split_multipart(&out, "TestBoundary");
    assert_eq!(parts.len(), reader.written_parts());
    for (idx, part) in parts.iter().enumerate() {
        assert_eq!(part.headers, vec![
            ("Content-Disposition".to_owned(), format!("form-data; name=\"File{}\"", idx)),
            ("Custom-Header".to_owned(), format!("{}", idx)),
        ]);
        assert_eq!(part.body, format!("Hello {}", idx).into_bytes());
    }
}

#[test]
fn buffer_size_does_not_change_the_output() {
    let reference = read_with_buf_size(
        &mut MultipartReader::new(counting(5)).with_boundary("TestBoundary"), 1 << 16);

    for &size in &[1, 2, 3, 7, 13, 64] {
        let out = read_with_buf_size(
            &mut MultipartReader::new(counting(5)).with_boundary("TestBoundary"), size);
        assert_eq!(out, reference, "buffer size {}", size);
    }
}

#[test]
fn one_byte_fill_calls_match_one_big_call() {
    let mut big = Encoder::new().with_boundary("TestBoundary").with_part_source(counting(3));
    let mut small = Encoder::new().with_boundary("TestBoundary").with_part_source(counting(3));

    fn collect(encoder: &mut Encoder<Counting>, size: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; size];
        loop {
            let filled = encoder.fill(&mut buf).unwrap();
            out.extend_from_slice(&buf[..filled.written]);
            if filled.is_end_of_stream() {
                return out;
            }
        }
    }

    let big_out = collect(&mut big, 1 << 16);
    let small_out = collect(&mut small, 1);
    assert_eq!(big_out, small_out);
    assert_eq!(String::from_utf8(small_out).unwrap(), EXPECTED);
    assert_eq!(small.written_parts(), 3);
}

#[test]
fn zero_parts_give_a_valid_empty_body() {
    let mut reader = MultipartReader::new(counting(0)).with_boundary("TestBoundary");
    let out = read_with_buf_size(&mut reader, 3);

    assert_eq!(out, &b"\r\n--TestBoundary--"[..]);
    assert_eq!(reader.written_parts(), 0);
    assert!(split_multipart(&out, "TestBoundary").is_empty());
}

#[test]
fn many_parts_with_binary_bodies() {
    let parts = (0..50u8).map(|idx| {
        let body: Vec<u8> = (0..idx as usize * 37).map(|byte| (byte % 251) as u8).collect();
        Part::form_file(&format!("file{}", idx), "blob.bin", io::Cursor::new(body))
    });
    let mut reader = MultipartReader::new(source::from_iter(parts))
        .with_rng(StdRng::seed_from_u64(3));

    let out = read_with_buf_size(&mut reader, 1000);
    let boundary = reader.boundary().unwrap().to_owned();
    let decoded = split_multipart(&out, &boundary);

    assert_eq!(decoded.len(), 50);
    assert_eq!(reader.written_parts(), 50);
    for (idx, part) in decoded.iter().enumerate() {
        assert_eq!(part.body.len(), idx * 37);
        assert_eq!(part.headers[0].0, "Content-Disposition");
        assert_eq!(part.headers[0].1, format!("form-data; name=\"file{}\"; filename=\"blob.bin\"", idx));
        assert_eq!(part.headers[1], ("Content-Type".to_owned(), "application/octet-stream".to_owned()));
    }
}

#[test]
fn random_boundaries() {
    let mut first = MultipartReader::new(counting(1));
    let mut second = MultipartReader::new(counting(1));
    let first_out = read_with_buf_size(&mut first, 128);
    read_with_buf_size(&mut second, 128);

    let boundary = first.boundary().unwrap();
    assert_eq!(boundary.len(), 60);
    assert!(boundary.bytes().all(|byte| (byte as char).is_ascii_hexdigit() && !(byte as char).is_ascii_uppercase()));
    assert_ne!(first.boundary(), second.boundary());
    assert_eq!(split_multipart(&first_out, boundary).len(), 1);
}

#[test]
fn missing_part_source() {
    let mut encoder: Encoder = Encoder::new().with_boundary("TestBoundary");
    let mut buf = [0u8; 32];
    for _ in 0..2 {
        let err = encoder.fill(&mut buf).unwrap_err();
        match MultipartError::from_io(&err) {
            Some(&MultipartError::MissingPartSource) => {},
            other => panic!("unexpected error {:?}", other)
        }
        assert!(buf.iter().all(|&byte| byte == 0));
    }
    assert_eq!(encoder.written_parts(), 0);
}

#[test]
fn part_source_failing_at_once() {
    let mut reader = MultipartReader::new(source::from_fn(|| {
        Err(io::Error::new(io::ErrorKind::Other, "Custom Error"))
    })).with_boundary("TestBoundary");

    let mut buf = [0u8; 32];
    let err = reader.read(&mut buf).unwrap_err();
    assert_eq!(err.to_string(), "Custom Error");
    assert!(buf.iter().all(|&byte| byte == 0));
    assert_eq!(reader.written_parts(), 0);
}

#[test]
fn boxed_part_sources_can_be_swapped() {
    let mut reader: MultipartReader = MultipartReader::new(Box::new(counting(1)) as BoxPartSource);
    reader.set_boundary("TestBoundary").unwrap();
    let first = read_with_buf_size(&mut reader, 64);

    let next: BoxPartSource = Box::new(source::from_iter(vec![Part::form_field("x", "y")]));
    reader.set_part_source(next);
    let second = read_with_buf_size(&mut reader, 64);

    assert_eq!(split_multipart(&first, "TestBoundary").len(), 1);
    let decoded = split_multipart(&second, "TestBoundary");
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].body, b"y".to_vec());
}
