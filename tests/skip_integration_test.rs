use std::collections::VecDeque;
use std::io::Cursor;

use bytes::Bytes;
use thrift_skip::codec::types::{FieldHeader, ListHeader, MapHeader, MessageHeader, SetHeader};
use thrift_skip::{
    skip, skip_binary, skip_binary_with_limits, skip_with_limits, BinaryProtocol, Error,
    MemoryBuffer, ProtocolReader, ProtocolWriter, ReadSource, Result, SkipLimits, TMessageType,
    TType,
};

/// Writes a struct exercising every wire type and returns the bytes plus the
/// sum of the counts reported by the writer.
fn encode_everything() -> (Vec<u8>, usize) {
    let mut w = BinaryProtocol::new(Vec::new());
    let mut n = 0;
    n += w.write_struct_begin("Everything").unwrap();

    n += w.write_field_begin("flag", TType::Bool, 1).unwrap();
    n += w.write_bool(true).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("small", TType::Byte, 2).unwrap();
    n += w.write_byte(-7).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("short", TType::I16, 3).unwrap();
    n += w.write_i16(300).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("int", TType::I32, 4).unwrap();
    n += w.write_i32(-123_456).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("long", TType::I64, 5).unwrap();
    n += w.write_i64(1 << 40).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("ratio", TType::Double, 6).unwrap();
    n += w.write_double(0.125).unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_begin("name", TType::String, 7).unwrap();
    n += w.write_string("thrift").unwrap();
    n += w.write_field_end().unwrap();

    // map<string, list<i16>>
    n += w.write_field_begin("index", TType::Map, 8).unwrap();
    n += w
        .write_map_begin(&MapHeader { key_type: TType::String, value_type: TType::List, size: 2 })
        .unwrap();
    for (key, values) in [("a", vec![1i16, 2, 3]), ("b", vec![])] {
        n += w.write_string(key).unwrap();
        n += w
            .write_list_begin(&ListHeader { element_type: TType::I16, size: values.len() })
            .unwrap();
        for v in values {
            n += w.write_i16(v).unwrap();
        }
        n += w.write_list_end().unwrap();
    }
    n += w.write_map_end().unwrap();
    n += w.write_field_end().unwrap();

    // set<binary>
    n += w.write_field_begin("blobs", TType::Set, 9).unwrap();
    n += w.write_set_begin(&SetHeader { element_type: TType::String, size: 2 }).unwrap();
    n += w.write_binary(&[0xff, 0x00, 0xfe]).unwrap();
    n += w.write_binary(&[]).unwrap();
    n += w.write_set_end().unwrap();
    n += w.write_field_end().unwrap();

    // list<struct { 1: i32 }>
    n += w.write_field_begin("children", TType::List, 10).unwrap();
    n += w.write_list_begin(&ListHeader { element_type: TType::Struct, size: 2 }).unwrap();
    for id in 0..2 {
        n += w.write_struct_begin("Child").unwrap();
        n += w.write_field_begin("id", TType::I32, 1).unwrap();
        n += w.write_i32(id).unwrap();
        n += w.write_field_end().unwrap();
        n += w.write_field_stop().unwrap();
        n += w.write_struct_end().unwrap();
    }
    n += w.write_list_end().unwrap();
    n += w.write_field_end().unwrap();

    n += w.write_field_stop().unwrap();
    n += w.write_struct_end().unwrap();
    (w.into_transport(), n)
}

#[test]
fn test_round_trip_accounting() {
    let (bytes, written) = encode_everything();
    assert_eq!(written, bytes.len());

    let mut source = MemoryBuffer::with_data(&bytes);
    assert_eq!(skip_binary(&mut source, TType::Struct).unwrap(), written);
    assert!(source.is_empty());
}

#[test]
fn test_cross_engine_equivalence() {
    let (bytes, _) = encode_everything();

    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&bytes));
    let via_protocol = skip(&mut proto, TType::Struct).unwrap();

    let mut source = MemoryBuffer::with_data(&bytes);
    let via_binary = skip_binary(&mut source, TType::Struct).unwrap();

    assert_eq!(via_protocol, via_binary);
    assert_eq!(proto.transport().consumed(), source.consumed());
}

#[test]
fn test_documented_encodings_both_engines() {
    let cases: [(TType, &[u8], usize); 4] = [
        (TType::Struct, &[0x03, 0x00, 0x01, 0x07, 0x00], 5),
        (TType::Map, &[0x08, 0x0b, 0x00, 0x00, 0x00, 0x00], 6),
        (TType::String, &[0x00, 0x00, 0x00, 0x03, b'a', b'b', b'c'], 7),
        (TType::List, &[0x02, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00], 7),
    ];
    for (ttype, data, expected) in cases {
        let mut source = MemoryBuffer::with_data(data);
        assert_eq!(skip_binary(&mut source, ttype).unwrap(), expected);
        assert_eq!(source.consumed(), expected);

        let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(data));
        assert_eq!(skip(&mut proto, ttype).unwrap(), expected);
        assert_eq!(proto.transport().consumed(), expected);

        // one byte short must fail, never report a smaller count
        let truncated = &data[..data.len() - 1];
        let err = skip_binary(&mut MemoryBuffer::with_data(truncated), ttype).unwrap_err();
        assert!(err.is_short_read(), "binary {:?}: {}", ttype, err);
        let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(truncated));
        let err = skip(&mut proto, ttype).unwrap_err();
        assert!(err.is_short_read(), "protocol {:?}: {}", ttype, err);
    }
}

#[test]
fn test_negative_size_rejected_by_both_engines() {
    let data = [0x08, 0xff, 0xff, 0xff, 0xff];
    let err = skip_binary(&mut MemoryBuffer::with_data(&data), TType::List).unwrap_err();
    assert!(matches!(err, Error::NegativeSize(-1)));

    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&data));
    let err = skip(&mut proto, TType::List).unwrap_err();
    assert!(matches!(err, Error::NegativeSize(-1)));
}

#[test]
fn test_depth_ceiling_on_hostile_nesting() {
    // 100 nested lists, each declaring one list element
    let mut data = Vec::new();
    for _ in 0..100 {
        data.extend_from_slice(&[0x0f, 0x00, 0x00, 0x00, 0x01]);
    }
    data.extend_from_slice(&[0x08, 0x00, 0x00, 0x00, 0x00]);

    let err = skip_binary(&mut MemoryBuffer::with_data(&data), TType::List).unwrap_err();
    assert!(matches!(err, Error::DepthLimit(64)));

    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&data));
    let err = skip(&mut proto, TType::List).unwrap_err();
    assert!(matches!(err, Error::DepthLimit(64)));

    let limits = SkipLimits::with_max_depth(101);
    let mut source = MemoryBuffer::with_data(&data);
    assert_eq!(skip_binary_with_limits(&mut source, TType::List, &limits).unwrap(), data.len());
    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&data));
    assert_eq!(skip_with_limits(&mut proto, TType::List, &limits).unwrap(), data.len());
}

#[test]
fn test_container_ceiling() {
    // declares 1_000_000 elements but carries none
    let data = [0x03, 0x00, 0x0f, 0x42, 0x40];
    let limits = SkipLimits::default().max_container_size(1024);
    let err = skip_binary_with_limits(&mut MemoryBuffer::with_data(&data), TType::List, &limits)
        .unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 1_000_000, limit: 1024 }));

    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&data));
    let err = skip_with_limits(&mut proto, TType::List, &limits).unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 1_000_000, limit: 1024 }));
}

#[test]
fn test_string_ceiling_both_engines() {
    let data = [0x00, 0x00, 0x00, 0x05, b'a', b'b', b'c', b'd', b'e'];
    let limits = SkipLimits::default().max_string_len(2);

    let err = skip_binary_with_limits(&mut MemoryBuffer::with_data(&data), TType::String, &limits)
        .unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 5, limit: 2 }));

    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&data));
    let err = skip_with_limits(&mut proto, TType::String, &limits).unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 5, limit: 2 }));

    // string field nested in a struct hits the same ceiling
    let mut nested = vec![0x0b, 0x00, 0x01];
    nested.extend_from_slice(&data);
    nested.push(0x00);
    let err = skip_binary_with_limits(&mut MemoryBuffer::with_data(&nested), TType::Struct, &limits)
        .unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 5, limit: 2 }));
    let mut proto = BinaryProtocol::new(MemoryBuffer::with_data(&nested));
    let err = skip_with_limits(&mut proto, TType::Struct, &limits).unwrap_err();
    assert!(matches!(err, Error::SizeLimit { size: 5, limit: 2 }));
}

#[test]
fn test_hostile_string_length_on_stream() {
    // length 0x7fffffff followed by a few payload bytes
    let mut data = vec![0x7f, 0xff, 0xff, 0xff];
    data.extend_from_slice(&[0u8; 32]);
    let limits = SkipLimits::default().max_string_len(16);

    let mut source = ReadSource::new(Cursor::new(data.clone()));
    let err = skip_binary_with_limits(&mut source, TType::String, &limits).unwrap_err();
    assert!(matches!(err, Error::SizeLimit { limit: 16, .. }));
    assert_eq!(source.consumed(), 4);

    let mut proto = BinaryProtocol::new(ReadSource::new(Cursor::new(data.clone())));
    let err = skip_with_limits(&mut proto, TType::String, &limits).unwrap_err();
    assert!(matches!(err, Error::SizeLimit { limit: 16, .. }));
    assert_eq!(proto.transport().consumed(), 4);

    // without a ceiling the stream simply runs dry
    let mut proto = BinaryProtocol::new(ReadSource::new(Cursor::new(data)));
    let err = proto.read_binary().unwrap_err();
    assert!(matches!(err, Error::ShortRead { available: 32, .. }));
}

#[test]
fn test_skip_reply_message_from_stream() {
    let mut w = BinaryProtocol::new(Vec::new());
    let header = MessageHeader {
        name: "getUser".to_string(),
        message_type: TMessageType::Reply,
        sequence_id: 9,
    };
    w.write_message_begin(&header).unwrap();
    w.write_struct_begin("result").unwrap();
    w.write_field_begin("success", TType::String, 0).unwrap();
    w.write_string("alice").unwrap();
    w.write_field_end().unwrap();
    w.write_field_stop().unwrap();
    w.write_struct_end().unwrap();
    w.write_message_end().unwrap();
    w.write_i32(0x0bad_f00d).unwrap(); // trailing data of the next message
    let bytes = w.into_transport();

    let mut proto = BinaryProtocol::new(ReadSource::new(Cursor::new(bytes)));
    let (read_header, header_len) = proto.read_message_begin().unwrap();
    assert_eq!(read_header, header);
    assert_eq!(header_len, 4 + 4 + 7 + 4);

    let body_len = proto.skip_binary(TType::Struct).unwrap();
    assert_eq!(body_len, 3 + 4 + 5 + 1);
    assert_eq!(proto.read_message_end().unwrap(), 0);
    assert_eq!(proto.read_i32().unwrap(), (0x0bad_f00d, 4));
    assert_eq!(proto.transport().consumed(), header_len + body_len + 4);
}

#[test]
fn test_read_source_short_read() {
    let data = vec![0x0b, 0x00, 0x01, 0x00, 0x00, 0x00, 0x09, b'x'];
    let mut source = ReadSource::new(Cursor::new(data));
    let err = skip_binary(&mut source, TType::Struct).unwrap_err();
    assert!(matches!(err, Error::ShortRead { requested: 9, available: 1 }));
}

/// Protocol double with its own made-up encoding: every call pops the next
/// scripted event and reports the byte count attached to it.
struct ScriptedProtocol {
    events: VecDeque<Event>,
    calls: Vec<&'static str>,
}

enum Event {
    Marker(usize),
    Field(FieldHeader, usize),
    Map(MapHeader, usize),
    List(ListHeader, usize),
    Set(SetHeader, usize),
    Primitive(usize),
}

impl ScriptedProtocol {
    fn new(events: Vec<Event>) -> Self {
        ScriptedProtocol { events: events.into(), calls: Vec::new() }
    }

    fn next(&mut self, call: &'static str) -> Result<Event> {
        self.calls.push(call);
        self.events
            .pop_front()
            .ok_or(Error::ShortRead { requested: 1, available: 0 })
    }

    fn marker(&mut self, call: &'static str) -> Result<usize> {
        match self.next(call)? {
            Event::Marker(n) | Event::Primitive(n) => Ok(n),
            _ => Err(Error::ProtocolError(format!("unexpected event for {}", call))),
        }
    }
}

impl ProtocolReader for ScriptedProtocol {
    fn read_message_begin(&mut self) -> Result<(MessageHeader, usize)> {
        Err(Error::ProtocolError("not scripted".to_string()))
    }
    fn read_message_end(&mut self) -> Result<usize> {
        self.marker("message_end")
    }
    fn read_struct_begin(&mut self) -> Result<usize> {
        self.marker("struct_begin")
    }
    fn read_struct_end(&mut self) -> Result<usize> {
        self.marker("struct_end")
    }
    fn read_field_begin(&mut self) -> Result<(FieldHeader, usize)> {
        match self.next("field_begin")? {
            Event::Field(header, n) => Ok((header, n)),
            _ => Err(Error::ProtocolError("expected field".to_string())),
        }
    }
    fn read_field_end(&mut self) -> Result<usize> {
        self.marker("field_end")
    }
    fn read_map_begin(&mut self) -> Result<(MapHeader, usize)> {
        match self.next("map_begin")? {
            Event::Map(header, n) => Ok((header, n)),
            _ => Err(Error::ProtocolError("expected map".to_string())),
        }
    }
    fn read_map_end(&mut self) -> Result<usize> {
        self.marker("map_end")
    }
    fn read_list_begin(&mut self) -> Result<(ListHeader, usize)> {
        match self.next("list_begin")? {
            Event::List(header, n) => Ok((header, n)),
            _ => Err(Error::ProtocolError("expected list".to_string())),
        }
    }
    fn read_list_end(&mut self) -> Result<usize> {
        self.marker("list_end")
    }
    fn read_set_begin(&mut self) -> Result<(SetHeader, usize)> {
        match self.next("set_begin")? {
            Event::Set(header, n) => Ok((header, n)),
            _ => Err(Error::ProtocolError("expected set".to_string())),
        }
    }
    fn read_set_end(&mut self) -> Result<usize> {
        self.marker("set_end")
    }
    fn read_bool(&mut self) -> Result<(bool, usize)> {
        Ok((true, self.marker("bool")?))
    }
    fn read_byte(&mut self) -> Result<(i8, usize)> {
        Ok((0, self.marker("byte")?))
    }
    fn read_i16(&mut self) -> Result<(i16, usize)> {
        Ok((0, self.marker("i16")?))
    }
    fn read_i32(&mut self) -> Result<(i32, usize)> {
        Ok((0, self.marker("i32")?))
    }
    fn read_i64(&mut self) -> Result<(i64, usize)> {
        Ok((0, self.marker("i64")?))
    }
    fn read_double(&mut self) -> Result<(f64, usize)> {
        Ok((0.0, self.marker("double")?))
    }
    fn read_string(&mut self) -> Result<(String, usize)> {
        Ok((String::new(), self.marker("string")?))
    }
    fn read_binary(&mut self) -> Result<(Bytes, usize)> {
        Ok((Bytes::new(), self.marker("binary")?))
    }
}

#[test]
fn test_protocol_skip_is_codec_agnostic() {
    // struct { 1: map<i32, bool> (one entry), 2: set<double> (empty), 3: list<string> (one) }
    let mut proto = ScriptedProtocol::new(vec![
        Event::Marker(10),
        Event::Field(FieldHeader::new(TType::Map, 1), 3),
        Event::Map(MapHeader { key_type: TType::I32, value_type: TType::Bool, size: 1 }, 2),
        Event::Primitive(5),
        Event::Primitive(1),
        Event::Marker(1),
        Event::Marker(4),
        Event::Field(FieldHeader::new(TType::Set, 2), 3),
        Event::Set(SetHeader { element_type: TType::Double, size: 0 }, 2),
        Event::Marker(1),
        Event::Marker(4),
        Event::Field(FieldHeader::new(TType::List, 3), 3),
        Event::List(ListHeader { element_type: TType::String, size: 1 }, 2),
        Event::Primitive(11),
        Event::Marker(1),
        Event::Marker(4),
        Event::Field(FieldHeader::stop(), 2),
        Event::Marker(20),
    ]);

    let consumed = proto.skip(TType::Struct).unwrap();
    assert_eq!(consumed, 10 + (3 + 2 + 5 + 1 + 1 + 4) + (3 + 2 + 1 + 4) + (3 + 2 + 11 + 1 + 4) + 2 + 20);
    assert!(proto.events.is_empty());
    assert_eq!(
        proto.calls,
        vec![
            "struct_begin",
            "field_begin",
            "map_begin",
            "i32",
            "bool",
            "map_end",
            "field_end",
            "field_begin",
            "set_begin",
            "set_end",
            "field_end",
            "field_begin",
            "list_begin",
            "binary",
            "list_end",
            "field_end",
            "field_begin",
            "struct_end",
        ]
    );
}

#[test]
fn test_protocol_skip_rejects_void_element() {
    let mut proto = ScriptedProtocol::new(vec![Event::List(
        ListHeader { element_type: TType::Void, size: 1 },
        5,
    )]);
    let err = proto.skip(TType::List).unwrap_err();
    assert!(matches!(err, Error::UnexpectedType(TType::Void)));
}
