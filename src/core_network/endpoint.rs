//! The 6-value host-port tuple used by PASV replies and PORT
//! parameters: `h1,h2,h3,h4,p1,p2` where the port is `p1 * 256 + p2`.

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::FtpError;

/// Encodes a socket address as a comma-separated 6-value tuple.
pub fn encode(addr: &SocketAddrV4) -> String {
    let octets = addr.ip().octets();
    let port = addr.port();
    format!(
        "{},{},{},{},{},{}",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port / 256,
        port % 256
    )
}

/// Decodes a 6-value tuple into a socket address. Exactly six
/// comma-separated values are required, each in `0..=255`.
pub fn decode(tuple: &str) -> Result<SocketAddrV4, FtpError> {
    let parts: Vec<u8> = tuple
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| FtpError::MalformedResponse(tuple.to_string()))?;
    let &[h1, h2, h3, h4, p1, p2] = parts.as_slice() else {
        return Err(FtpError::MalformedResponse(tuple.to_string()));
    };
    let port = u16::from(p1) * 256 + u16::from(p2);
    Ok(SocketAddrV4::new(Ipv4Addr::new(h1, h2, h3, h4), port))
}

/// Extracts and decodes the tuple from a 227 reply. The tuple is
/// taken from the first parenthesized group; servers vary in the text
/// around it, so nothing else in the message is interpreted.
pub fn decode_pasv_reply(message: &str) -> Result<SocketAddrV4, FtpError> {
    let start = message
        .find('(')
        .ok_or_else(|| FtpError::MalformedResponse(message.to_string()))?;
    let end = message[start..]
        .find(')')
        .ok_or_else(|| FtpError::MalformedResponse(message.to_string()))?;
    decode(&message[start + 1..start + end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_round_trip() {
        let addr = SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 20), 2121);
        let tuple = encode(&addr);
        assert_eq!(tuple, "192,168,1,20,8,73");
        assert_eq!(decode(&tuple).unwrap(), addr);
    }

    #[test]
    fn port_reconstruction_edges() {
        for port in [0u16, 255, 256, 65535] {
            let addr = SocketAddrV4::new(Ipv4Addr::LOCALHOST, port);
            assert_eq!(decode(&encode(&addr)).unwrap().port(), port);
        }
    }

    #[test]
    fn wrong_arity_is_rejected() {
        assert!(decode("127,0,0,1,8").is_err());
        assert!(decode("127,0,0,1,8,73,0").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(decode("127,0,0,1,300,1").is_err());
        assert!(decode("a,b,c,d,e,f").is_err());
    }

    #[test]
    fn pasv_reply_extraction() {
        let addr =
            decode_pasv_reply("Entering Passive Mode (127,0,0,1,8,73)").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, 2121));
        assert!(decode_pasv_reply("Entering Passive Mode").is_err());
        assert!(decode_pasv_reply("no tuple (here").is_err());
    }
}
