//! HID packet protocol implementation for six key decks.
//!
//! Icons travel to the device as a 24-bit BMP split across fixed 1024-byte
//! interrupt reports. The first report carries the BMP prologue, the rest
//! carry raw pixel data:
//! - Page 1: 16-byte report header + 54-byte BMP prologue + first 954
//!   pixel bytes
//! - Page 2+: 16-byte report header + up to 1008 pixel bytes each
//!
//! Report header (16 bytes):
//! - Byte 0: 0x02 (report id)
//! - Byte 1: 0x01 (icon write command)
//! - Byte 2: page number (0 on page 1, then 1..=0x13)
//! - Byte 3: reserved (0)
//! - Byte 4: last page flag (1 on page 0x13)
//! - Byte 5: key id (1-based)
//! - Bytes 6-15: reserved (0)
//!
//! Brightness is set out of band with a 17-byte feature report.

use crate::consts::ICON_BYTES;

/// Total size of every icon packet
pub const PACKET_SIZE: usize = 1024;
/// Report header + BMP prologue on page 1
pub const PAGE1_HEADER_LEN: usize = 70;
/// Report header on page 2+
pub const PAGE2_HEADER_LEN: usize = 16;
/// Pixel bytes carried by page 1
pub const PAGE1_PAYLOAD: usize = PACKET_SIZE - PAGE1_HEADER_LEN;
/// Pixel bytes carried by each page 2 packet
pub const PAGE2_PAYLOAD: usize = PACKET_SIZE - PAGE2_HEADER_LEN;
/// Page number of the final chunk of a full icon stream
pub const LAST_PAGE: u8 = 0x13;
/// Total size of the brightness feature report
pub const BRIGHTNESS_REPORT_SIZE: usize = 17;

/// BMP prologue for an 80x80 24-bit bottom-up bitmap: magic, file size
/// 19254, pixel data offset 54, BITMAPINFOHEADER with 19200 pixel bytes
/// and 3780 pixels-per-meter resolution.
const BMP_HEADER: [u8; 54] = [
    0x42, 0x4D, // "BM"
    0x36, 0x4B, 0x00, 0x00, // file size
    0x00, 0x00, 0x00, 0x00, // reserved
    0x36, 0x00, 0x00, 0x00, // pixel data offset
    0x28, 0x00, 0x00, 0x00, // info header size
    0x50, 0x00, 0x00, 0x00, // width
    0x50, 0x00, 0x00, 0x00, // height
    0x01, 0x00, // planes
    0x18, 0x00, // bits per pixel
    0x00, 0x00, 0x00, 0x00, // no compression
    0x00, 0x4B, 0x00, 0x00, // pixel data size
    0xC4, 0x0E, 0x00, 0x00, // x resolution
    0xC4, 0x0E, 0x00, 0x00, // y resolution
    0x00, 0x00, 0x00, 0x00, // palette colors
    0x00, 0x00, 0x00, 0x00, // important colors
];

fn report_header(packet: &mut [u8; PACKET_SIZE], page: u8, key: u8) {
    packet[0] = 0x02;
    packet[1] = 0x01;
    packet[2] = page;
    packet[4] = (page == LAST_PAGE) as u8;
    packet[5] = key + 1;
}

/// Build the first packet of an icon upload, zero padded to 1024 bytes.
pub fn page1_packet(key: u8, payload: &[u8]) -> [u8; PACKET_SIZE] {
    debug_assert!(payload.len() <= PAGE1_PAYLOAD);
    let mut packet = [0u8; PACKET_SIZE];
    report_header(&mut packet, 0, key);
    packet[16..PAGE1_HEADER_LEN].copy_from_slice(&BMP_HEADER);
    packet[PAGE1_HEADER_LEN..PAGE1_HEADER_LEN + payload.len()].copy_from_slice(payload);
    packet
}

/// Build a continuation packet of an icon upload, zero padded to 1024 bytes.
pub fn page2_packet(key: u8, page: u8, payload: &[u8]) -> [u8; PACKET_SIZE] {
    debug_assert!(payload.len() <= PAGE2_PAYLOAD);
    let mut packet = [0u8; PACKET_SIZE];
    report_header(&mut packet, page, key);
    packet[PAGE2_HEADER_LEN..PAGE2_HEADER_LEN + payload.len()].copy_from_slice(payload);
    packet
}

/// Build the full packet sequence carrying one key's pixel stream, one
/// page 1 packet followed by page 2 packets numbered from 1.
pub fn key_packets(key: u8, stream: &[u8; ICON_BYTES]) -> Vec<[u8; PACKET_SIZE]> {
    let (first, rest) = stream.split_at(PAGE1_PAYLOAD);
    let mut packets = vec![page1_packet(key, first)];
    for (i, chunk) in rest.chunks(PAGE2_PAYLOAD).enumerate() {
        packets.push(page2_packet(key, i as u8 + 1, chunk));
    }
    packets
}

/// Build the brightness feature report.
pub fn brightness_report(percent: u8) -> [u8; BRIGHTNESS_REPORT_SIZE] {
    let mut report = [0u8; BRIGHTNESS_REPORT_SIZE];
    report[..5].copy_from_slice(&[0x05, 0x55, 0xAA, 0xD1, 0x01]);
    report[5] = percent;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page1_header_layout() {
        let payload = [0xEE; PAGE1_PAYLOAD];
        let packet = page1_packet(2, &payload);
        assert_eq!(&packet[..6], [0x02, 0x01, 0x00, 0x00, 0x00, 0x03]);
        assert_eq!(&packet[6..16], [0u8; 10]);
        // BMP prologue: magic, file size, 80x80, 24bpp, pixel data size
        assert_eq!(&packet[16..18], b"BM");
        assert_eq!(&packet[18..22], 19254u32.to_le_bytes());
        assert_eq!(&packet[34..38], 80u32.to_le_bytes());
        assert_eq!(&packet[38..42], 80u32.to_le_bytes());
        assert_eq!(&packet[44..46], 24u16.to_le_bytes());
        assert_eq!(&packet[50..54], 19200u32.to_le_bytes());
        assert_eq!(&packet[PAGE1_HEADER_LEN..], payload);
    }

    #[test]
    fn page2_header_layout() {
        let packet = page2_packet(0, 1, &[0xAA; PAGE2_PAYLOAD]);
        assert_eq!(&packet[..6], [0x02, 0x01, 0x01, 0x00, 0x00, 0x01]);
        assert_eq!(&packet[PAGE2_HEADER_LEN..], [0xAA; PAGE2_PAYLOAD]);
    }

    #[test]
    fn short_final_chunk_is_padded_and_flagged() {
        let packet = page2_packet(5, LAST_PAGE, &[0xBB; 102]);
        assert_eq!(&packet[..6], [0x02, 0x01, 0x13, 0x00, 0x01, 0x06]);
        assert_eq!(&packet[16..118], [0xBB; 102]);
        assert_eq!(&packet[118..], [0u8; PACKET_SIZE - 118]);
    }

    #[test]
    fn solid_fill_packet_sequence() {
        // rgb (10, 20, 30) lands on the wire as bgr
        let stream = crate::raster::solid_pixels(10, 20, 30);
        let packets = key_packets(0, &stream);
        assert_eq!(packets.len(), 20);

        // only page 0x13 carries the last page flag
        for (i, packet) in packets.iter().enumerate() {
            assert_eq!(packet[4], (i == 19) as u8, "packet {i}");
        }
        assert_eq!(packets[19][2], LAST_PAGE);

        // reassembling the payloads recovers the original stream
        let mut assembled = Vec::with_capacity(ICON_BYTES);
        assembled.extend_from_slice(&packets[0][PAGE1_HEADER_LEN..]);
        for packet in &packets[1..] {
            assembled.extend_from_slice(&packet[PAGE2_HEADER_LEN..]);
        }
        assembled.truncate(ICON_BYTES);
        assert_eq!(assembled, stream);
        assert!(assembled.chunks_exact(3).all(|px| px == [30, 20, 10]));
    }

    #[test]
    fn brightness_wire_format() {
        assert_eq!(
            brightness_report(100),
            [0x05, 0x55, 0xAA, 0xD1, 0x01, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }
}
