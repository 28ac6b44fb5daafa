use crate::{
    params::ParameterSet,
    signing::{pem, SignedRequest},
    Error,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use openssl::{
    hash::MessageDigest,
    memcmp,
    pkey::PKey,
    rsa::{Padding, Rsa},
    symm::{self, Cipher},
};
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;

/// Encrypts a serialized payload for a counterparty.
pub trait PayloadEncryptor: Send + Sync + fmt::Debug {
    /// Encrypts `plaintext` so that only the owner of `public_key_pem` can read it.
    fn encrypt(&self, plaintext: &str, public_key_pem: &str) -> Result<String, Error>;
}

/// The `lianpay1_0_1` envelope used by the LianLian instant-pay gateway.
///
/// `version$rsa(hmac_key)$rsa(aes_key)$nonce$ciphertext$tag`, where both keys are
/// RSA-OAEP encrypted, the payload is AES-256-CTR encrypted and the tag is a hex encoded
/// HMAC-SHA256 over `nonce$ciphertext`. All binary fields are base64 encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct LianPayEncryptor;

impl LianPayEncryptor {
    pub const VERSION: &'static str = "lianpay1_0_1";

    /// Opens an envelope with the counterparty's private key.
    ///
    /// Only the counterparty needs this; it is exposed to allow testing integrations
    /// end-to-end against a mock gateway.
    pub fn decrypt(&self, pay_load: &str, private_key_pem: &str) -> Result<String, Error> {
        let parts: Vec<&str> = pay_load.split('$').collect();
        let &[version, hmac_key, aes_key, nonce, ciphertext, tag] = parts.as_slice() else {
            return Err(Error::InvalidArgument("Malformed pay_load".into()));
        };
        if version != Self::VERSION {
            return Err(Error::InvalidArgument(format!(
                "Unsupported pay_load version: {}",
                version
            )));
        }

        let rsa = Rsa::private_key_from_pem(pem::rsa_private_key(private_key_pem).as_bytes())
            .map_err(|e| Error::CredentialError(format!("Invalid RSA private key: {}", e)))?;
        let rsa_decrypt = |encoded: &str| -> Result<Vec<u8>, Error> {
            let encrypted = STANDARD.decode(encoded).map_err(|e| Error::Other(e.into()))?;
            let mut buf = vec![0; rsa.size() as usize];
            let len = rsa
                .private_decrypt(&encrypted, &mut buf, Padding::PKCS1_OAEP)
                .map_err(|e| Error::Other(e.into()))?;
            buf.truncate(len);
            Ok(buf)
        };
        let hmac_key = rsa_decrypt(hmac_key)?;
        let aes_key = rsa_decrypt(aes_key)?;

        let expected_tag = hmac_sha256_hex(&hmac_key, &format!("{}${}", nonce, ciphertext))?;
        if expected_tag.len() != tag.len() || !memcmp::eq(expected_tag.as_bytes(), tag.as_bytes()) {
            return Err(Error::InvalidArgument("pay_load tag mismatch".into()));
        }

        let nonce = STANDARD.decode(nonce).map_err(|e| Error::Other(e.into()))?;
        let ciphertext = STANDARD
            .decode(ciphertext)
            .map_err(|e| Error::Other(e.into()))?;
        let plaintext = symm::decrypt(
            Cipher::aes_256_ctr(),
            &aes_key,
            Some(&counter_iv(&nonce)),
            &ciphertext,
        )
        .map_err(|e| Error::Other(e.into()))?;

        String::from_utf8(plaintext).map_err(|e| Error::Other(e.into()))
    }
}

impl PayloadEncryptor for LianPayEncryptor {
    fn encrypt(&self, plaintext: &str, public_key_pem: &str) -> Result<String, Error> {
        let hmac_key = random_alphanumeric(32);
        let aes_key = random_alphanumeric(32);
        let nonce = random_alphanumeric(8);

        let rsa = Rsa::public_key_from_pem(pem::public_key(public_key_pem).as_bytes())
            .map_err(|e| Error::CredentialError(format!("Invalid RSA public key: {}", e)))?;
        let rsa_encrypt = |data: &[u8]| -> Result<String, Error> {
            let mut buf = vec![0; rsa.size() as usize];
            let len = rsa
                .public_encrypt(data, &mut buf, Padding::PKCS1_OAEP)
                .map_err(|e| Error::SigningError(e.to_string()))?;
            Ok(STANDARD.encode(&buf[..len]))
        };

        let encrypted_hmac_key = rsa_encrypt(hmac_key.as_bytes())?;
        let encrypted_aes_key = rsa_encrypt(aes_key.as_bytes())?;
        let encoded_nonce = STANDARD.encode(&nonce);
        let ciphertext = symm::encrypt(
            Cipher::aes_256_ctr(),
            aes_key.as_bytes(),
            Some(&counter_iv(nonce.as_bytes())),
            plaintext.as_bytes(),
        )
        .map_err(|e| Error::SigningError(e.to_string()))?;
        let ciphertext = STANDARD.encode(ciphertext);
        let tag = hmac_sha256_hex(
            hmac_key.as_bytes(),
            &format!("{}${}", encoded_nonce, ciphertext),
        )?;

        Ok(format!(
            "{}${}${}${}${}${}",
            Self::VERSION,
            encrypted_hmac_key,
            encrypted_aes_key,
            encoded_nonce,
            ciphertext,
            tag
        ))
    }
}

/// Wraps a signed request into the reduced `{oid_partner, pay_load}` form.
#[tracing::instrument(name = "Build PayLoad", level = "debug", skip_all)]
pub fn build_pay_load(
    signed: &SignedRequest,
    oid_partner: &str,
    public_key_pem: &str,
    encryptor: &dyn PayloadEncryptor,
) -> Result<ParameterSet, Error> {
    tracing::debug!(params = ?signed.params(), "Build PayLoad before");

    let json = signed.params().to_json_string()?;
    let pay_load = encryptor.encrypt(&json, public_key_pem)?;

    Ok(ParameterSet::new()
        .with("oid_partner", oid_partner)
        .with("pay_load", pay_load))
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 16 byte CTR IV: the 8 byte nonce followed by a big-endian counter starting at 1.
fn counter_iv(nonce: &[u8]) -> Vec<u8> {
    let mut iv = nonce.to_vec();
    iv.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
    iv
}

fn hmac_sha256_hex(key: &[u8], message: &str) -> Result<String, Error> {
    let pkey = PKey::hmac(key).map_err(|e| Error::SigningError(e.to_string()))?;
    let mut signer = openssl::sign::Signer::new(MessageDigest::sha256(), &pkey)
        .map_err(|e| Error::SigningError(e.to_string()))?;
    signer
        .update(message.as_bytes())
        .map_err(|e| Error::SigningError(e.to_string()))?;
    let mac = signer
        .sign_to_vec()
        .map_err(|e| Error::SigningError(e.to_string()))?;

    Ok(hex::encode(mac))
}
