//! Standard security handler.
//!
//! RC4 documents (V 1-2) go through `lopdf`'s own decryption. AES documents
//! (V 4 with AESV2, V 5 with AESV3) are decrypted here: the file key is
//! derived from the user or owner password, then every string and stream
//! except the encryption dictionary itself is decrypted in place.

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use lopdf::{Dictionary, Document, Object, ObjectId};
use md5::{Digest, Md5};
use sha2::{Sha256, Sha384, Sha512};
use thiserror::Error;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Padding string for revision 2-4 passwords
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("document is not encrypted")]
    NotEncrypted,

    #[error("unsupported encryption: {0}")]
    Unsupported(String),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("malformed encryption data: {0}")]
    Malformed(String),

    #[error("{0}")]
    Lopdf(String),
}

/// How the document body is encrypted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Rc4,
    /// V 4, AESV2 crypt filter
    Aes128,
    /// V 5, AESV3 crypt filter
    Aes256,
}

/// Encryption dictionary settings needed for decryption
struct Handler {
    scheme: Scheme,
    revision: i64,
    /// RC4/AESV2 file key length in bytes
    key_len: i64,
    owner: Vec<u8>,
    user: Vec<u8>,
    owner_key: Vec<u8>,
    user_key: Vec<u8>,
    permissions: i32,
    encrypt_metadata: bool,
    strings: bool,
    streams: bool,
}

/// Encryption scheme of an encrypted document.
pub fn scheme(doc: &Document) -> Result<Scheme, SecurityError> {
    let (_, dict) = encrypt_dict(doc)?;
    Ok(Handler::from_dict(&dict)?.scheme)
}

/// Decrypt `doc` in memory with a user or owner password and drop its
/// encryption dictionary.
pub fn decrypt_document(doc: &mut Document, password: &str) -> Result<Scheme, SecurityError> {
    let (encrypt_id, dict) = encrypt_dict(doc)?;
    let handler = Handler::from_dict(&dict)?;

    match handler.scheme {
        Scheme::Rc4 => {
            // 128-bit revision 3: check the password here so an owner password
            // can be turned into the user password lopdf expects
            let user_password = if handler.revision >= 3 && handler.key_len == 16 {
                handler.r4_file_key(&first_id(doc)?, password.as_bytes())?.1
            } else {
                password.as_bytes().to_vec()
            };
            doc.decrypt(&user_password)
                .map_err(|e| SecurityError::Lopdf(e.to_string()))?;
        }
        Scheme::Aes128 | Scheme::Aes256 => {
            let file_key = match handler.scheme {
                Scheme::Aes128 => {
                    let (key, _) = handler.r4_file_key(&first_id(doc)?, password.as_bytes())?;
                    key.to_vec()
                }
                _ => handler.aes256_file_key(password.as_bytes())?,
            };
            for (&id, obj) in doc.objects.iter_mut() {
                if Some(id) == encrypt_id {
                    continue;
                }
                let key = match handler.scheme {
                    Scheme::Aes128 => object_key(&file_key, id),
                    _ => file_key.clone(),
                };
                handler.decrypt_object(obj, &key)?;
            }
        }
    }

    doc.trailer.remove(b"Encrypt");
    if let Some(id) = encrypt_id {
        doc.objects.remove(&id);
    }
    Ok(handler.scheme)
}

fn encrypt_dict(doc: &Document) -> Result<(Option<ObjectId>, Dictionary), SecurityError> {
    match doc.trailer.get(b"Encrypt") {
        Ok(Object::Reference(id)) => {
            let dict = doc
                .get_dictionary(*id)
                .map_err(|e| SecurityError::Malformed(format!("Encrypt: {e}")))?;
            Ok((Some(*id), dict.clone()))
        }
        Ok(Object::Dictionary(dict)) => Ok((None, dict.clone())),
        Ok(_) => Err(SecurityError::Malformed("Encrypt is not a dictionary".to_string())),
        Err(_) => Err(SecurityError::NotEncrypted),
    }
}

fn first_id(doc: &Document) -> Result<Vec<u8>, SecurityError> {
    doc.trailer
        .get(b"ID")
        .and_then(Object::as_array)
        .ok()
        .and_then(|ids| ids.first())
        .and_then(|id| id.as_str().ok())
        .map(<[u8]>::to_vec)
        .ok_or_else(|| SecurityError::Malformed("trailer has no ID".to_string()))
}

fn bytes_of(dict: &Dictionary, key: &[u8]) -> Vec<u8> {
    dict.get(key)
        .and_then(Object::as_str)
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
}

impl Handler {
    fn from_dict(dict: &Dictionary) -> Result<Self, SecurityError> {
        let filter = dict.get(b"Filter").and_then(Object::as_name).unwrap_or(b"");
        if filter != b"Standard" {
            return Err(SecurityError::Unsupported(format!(
                "security handler {}",
                String::from_utf8_lossy(filter)
            )));
        }

        let version = dict.get(b"V").and_then(Object::as_i64).unwrap_or(0);
        let revision = dict
            .get(b"R")
            .and_then(Object::as_i64)
            .map_err(|_| SecurityError::Malformed("missing R".to_string()))?;

        let (scheme, strings, streams) = match version {
            1 | 2 => (Scheme::Rc4, true, true),
            4 | 5 => {
                let stmf = crypt_method(dict, b"StmF")?;
                let strf = crypt_method(dict, b"StrF")?;
                let method = stmf.as_deref().or(strf.as_deref()).unwrap_or(b"None");
                let scheme = match (version, method) {
                    (4, b"AESV2") => Scheme::Aes128,
                    (5, b"AESV3") => Scheme::Aes256,
                    (_, m) => {
                        return Err(SecurityError::Unsupported(format!(
                            "V {version} crypt filter {}",
                            String::from_utf8_lossy(m)
                        )));
                    }
                };
                (scheme, strf.is_some(), stmf.is_some())
            }
            v => return Err(SecurityError::Unsupported(format!("V {v}"))),
        };

        let permissions = dict.get(b"P").and_then(Object::as_i64).unwrap_or(0) as i32;

        Ok(Self {
            scheme,
            revision,
            key_len: dict.get(b"Length").and_then(Object::as_i64).unwrap_or(40) / 8,
            owner: bytes_of(dict, b"O"),
            user: bytes_of(dict, b"U"),
            owner_key: bytes_of(dict, b"OE"),
            user_key: bytes_of(dict, b"UE"),
            permissions,
            encrypt_metadata: dict
                .get(b"EncryptMetadata")
                .and_then(Object::as_bool)
                .unwrap_or(true),
            strings,
            streams,
        })
    }

    /// 128-bit revision 3/4 file key, plus the user password it came from.
    /// Tries `password` as user, then as owner.
    fn r4_file_key(
        &self,
        id: &[u8],
        password: &[u8],
    ) -> Result<([u8; 16], Vec<u8>), SecurityError> {
        if self.owner.len() < 32 || self.user.len() < 16 {
            return Err(SecurityError::Malformed("O/U too short".to_string()));
        }

        let key = self.r4_key(id, password);
        if self.r4_user_matches(id, &key) {
            return Ok((key, password.to_vec()));
        }

        // Owner password: decrypt O back into the padded user password
        let mut owner_hash = md5_16(&pad_password(password));
        for _ in 0..50 {
            owner_hash = md5_16(&owner_hash);
        }
        let mut user_password = self.owner[..32].to_vec();
        for i in (0..20u8).rev() {
            rc4_apply(&xor_key(&owner_hash, i), &mut user_password);
        }
        let key = self.r4_key(id, &user_password);
        if self.r4_user_matches(id, &key) {
            return Ok((key, user_password));
        }

        Err(SecurityError::IncorrectPassword)
    }

    fn r4_key(&self, id: &[u8], password: &[u8]) -> [u8; 16] {
        let mut hasher = Md5::new();
        hasher.update(pad_password(password));
        hasher.update(&self.owner[..32]);
        hasher.update(self.permissions.to_le_bytes());
        hasher.update(id);
        if self.revision >= 4 && !self.encrypt_metadata {
            hasher.update([0xFF; 4]);
        }
        let mut key = [0u8; 16];
        key.copy_from_slice(&hasher.finalize());
        for _ in 0..50 {
            key = md5_16(&key);
        }
        key
    }

    fn r4_user_matches(&self, id: &[u8], key: &[u8; 16]) -> bool {
        let mut check = Md5::new().chain_update(PASSWORD_PAD).chain_update(id).finalize().to_vec();
        for i in 0..20u8 {
            rc4_apply(&xor_key(key, i), &mut check);
        }
        check[..] == self.user[..16]
    }

    /// Revision 5/6 key (AESV3): tries `password` as user, then as owner.
    fn aes256_file_key(&self, password: &[u8]) -> Result<Vec<u8>, SecurityError> {
        if self.owner.len() < 48 || self.user.len() < 48 {
            return Err(SecurityError::Malformed("O/U too short".to_string()));
        }
        let password = &password[..password.len().min(127)];
        let user = &self.user[..48];

        if self.r6_hash(password, &user[32..40], &[])? == user[..32] {
            let intermediate = self.r6_hash(password, &user[40..48], &[])?;
            return unwrap_file_key(&intermediate, &self.user_key);
        }

        let owner = &self.owner[..48];
        if self.r6_hash(password, &owner[32..40], user)? == owner[..32] {
            let intermediate = self.r6_hash(password, &owner[40..48], user)?;
            return unwrap_file_key(&intermediate, &self.owner_key);
        }

        Err(SecurityError::IncorrectPassword)
    }

    /// Password hash: plain SHA-256 for revision 5, iterated hash for 6.
    fn r6_hash(
        &self,
        password: &[u8],
        salt: &[u8],
        udata: &[u8],
    ) -> Result<Vec<u8>, SecurityError> {
        let mut k = Sha256::new()
            .chain_update(password)
            .chain_update(salt)
            .chain_update(udata)
            .finalize()
            .to_vec();
        if self.revision < 6 {
            return Ok(k);
        }

        let mut round: u32 = 0;
        loop {
            let mut block = Vec::with_capacity(password.len() + k.len() + udata.len());
            block.extend_from_slice(password);
            block.extend_from_slice(&k);
            block.extend_from_slice(udata);
            let k1 = block.repeat(64);

            let e = Aes128CbcEnc::new_from_slices(&k[..16], &k[16..32])
                .map_err(|e| SecurityError::Malformed(e.to_string()))?
                .encrypt_padded_vec_mut::<NoPadding>(&k1);

            // 256 = 1 (mod 3), so the byte sum has the same remainder
            k = match e[..16].iter().map(|&b| u32::from(b)).sum::<u32>() % 3 {
                0 => Sha256::digest(&e).to_vec(),
                1 => Sha384::digest(&e).to_vec(),
                _ => Sha512::digest(&e).to_vec(),
            };

            round += 1;
            let last = u32::from(e.last().copied().unwrap_or(0));
            if round >= 64 && last <= round - 32 {
                break;
            }
        }
        k.truncate(32);
        Ok(k)
    }

    fn decrypt_object(&self, obj: &mut Object, key: &[u8]) -> Result<(), SecurityError> {
        match obj {
            Object::String(bytes, _) if self.strings && !bytes.is_empty() => {
                *bytes = aes_cbc_decrypt(key, bytes)?;
            }
            Object::Array(items) => {
                for item in items.iter_mut() {
                    self.decrypt_object(item, key)?;
                }
            }
            Object::Dictionary(dict) => {
                for (_, value) in dict.iter_mut() {
                    self.decrypt_object(value, key)?;
                }
            }
            Object::Stream(stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    self.decrypt_object(value, key)?;
                }
                let kind = stream.dict.get(b"Type").and_then(Object::as_name).unwrap_or(b"");
                let plain = kind == b"XRef" || (kind == b"Metadata" && !self.encrypt_metadata);
                if self.streams && !plain && !stream.content.is_empty() {
                    let content = aes_cbc_decrypt(key, &stream.content)?;
                    stream.set_content(content);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Crypt filter method named by `StmF`/`StrF`; `None` for Identity.
fn crypt_method(dict: &Dictionary, which: &[u8]) -> Result<Option<Vec<u8>>, SecurityError> {
    let name = dict.get(which).and_then(Object::as_name).unwrap_or(b"Identity");
    if name == b"Identity" {
        return Ok(None);
    }
    let method = dict
        .get(b"CF")
        .and_then(Object::as_dict)
        .and_then(|cf| cf.get(name))
        .and_then(Object::as_dict)
        .and_then(|f| f.get(b"CFM"))
        .and_then(Object::as_name)
        .map_err(|_| {
            SecurityError::Malformed(format!(
                "crypt filter {} not defined",
                String::from_utf8_lossy(name)
            ))
        })?;
    Ok(Some(method.to_vec()))
}

fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut out = PASSWORD_PAD;
    let n = password.len().min(32);
    out[..n].copy_from_slice(&password[..n]);
    out[n..].copy_from_slice(&PASSWORD_PAD[..32 - n]);
    out
}

fn md5_16(data: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out.copy_from_slice(&Md5::digest(data));
    out
}

fn xor_key(key: &[u8; 16], i: u8) -> [u8; 16] {
    key.map(|b| b ^ i)
}

/// RC4 keystream over `data`, in place.
fn rc4_apply(key: &[u8; 16], data: &mut [u8]) {
    let mut state: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    for byte in data.iter_mut() {
        i = i.wrapping_add(1);
        j = j.wrapping_add(state[i as usize]);
        state.swap(i as usize, j as usize);
        *byte ^= state[state[i as usize].wrapping_add(state[j as usize]) as usize];
    }
}

/// Per-object AESV2 key
fn object_key(file_key: &[u8], (num, gen_no): ObjectId) -> Vec<u8> {
    Md5::new()
        .chain_update(file_key)
        .chain_update(&num.to_le_bytes()[..3])
        .chain_update(gen_no.to_le_bytes())
        .chain_update(b"sAlT")
        .finalize()
        .to_vec()
}

/// AES-CBC with the IV in the first 16 bytes and PKCS#7 padding.
fn aes_cbc_decrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError> {
    if data.len() < 32 || data.len() % 16 != 0 {
        return Err(SecurityError::Malformed(format!(
            "AES data of {} bytes",
            data.len()
        )));
    }
    let (iv, body) = data.split_at(16);
    let malformed = |e: &dyn std::fmt::Display| SecurityError::Malformed(e.to_string());

    let plain = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|e| malformed(&e))?
            .decrypt_padded_vec_mut::<Pkcs7>(body),
        _ => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|e| malformed(&e))?
            .decrypt_padded_vec_mut::<Pkcs7>(body),
    };
    plain.map_err(|_| SecurityError::Malformed("bad AES padding".to_string()))
}

/// Decrypt UE/OE (AES-256, zero IV, no padding) into the file key.
fn unwrap_file_key(intermediate: &[u8], wrapped: &[u8]) -> Result<Vec<u8>, SecurityError> {
    if wrapped.len() != 32 {
        return Err(SecurityError::Malformed("UE/OE must be 32 bytes".to_string()));
    }
    Aes256CbcDec::new_from_slices(intermediate, &[0u8; 16])
        .map_err(|e| SecurityError::Malformed(e.to_string()))?
        .decrypt_padded_vec_mut::<NoPadding>(wrapped)
        .map_err(|e| SecurityError::Malformed(e.to_string()))
}
