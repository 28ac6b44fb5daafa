use openssl::{
    asn1::Asn1Time,
    bn::BigNum,
    hash::MessageDigest,
    pkcs12::Pkcs12,
    pkey::{PKey, Private},
    rsa::Rsa,
    x509::{X509NameBuilder, X509},
};

/// RSA key pair in the PEM formats expected by the client.
#[derive(Clone)]
pub struct KeyPair {
    pub private_key_pem: String,
    pub public_key_pem: String,
}

impl KeyPair {
    pub fn generate() -> Self {
        let rsa = Rsa::generate(2048).unwrap();
        Self {
            private_key_pem: String::from_utf8(rsa.private_key_to_pem().unwrap()).unwrap(),
            public_key_pem: String::from_utf8(rsa.public_key_to_pem().unwrap()).unwrap(),
        }
    }

    /// The public key as the gateways hand it over: bare base64, no armor.
    pub fn bare_public_key(&self) -> String {
        self.public_key_pem
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect()
    }
}

/// Self-signed partner certificate, bundled with its key as PKCS#12.
pub struct CertificateBundle {
    pub der: Vec<u8>,
    pub passphrase: String,
    pub cert: X509,
}

impl CertificateBundle {
    pub fn generate(passphrase: &str) -> Self {
        let pkey: PKey<Private> = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", "200001234567").unwrap();
        name.append_entry_by_text("O", "mybank-rust").unwrap();
        let name = name.build();

        let mut builder = X509::builder().unwrap();
        builder.set_version(2).unwrap();
        builder
            .set_serial_number(&BigNum::from_u32(42).unwrap().to_asn1_integer().unwrap())
            .unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&pkey).unwrap();
        builder
            .set_not_before(&Asn1Time::days_from_now(0).unwrap())
            .unwrap();
        builder
            .set_not_after(&Asn1Time::days_from_now(30).unwrap())
            .unwrap();
        builder.sign(&pkey, MessageDigest::sha256()).unwrap();
        let cert = builder.build();

        let der = Pkcs12::builder()
            .name("partner")
            .pkey(&pkey)
            .cert(&cert)
            .build2(passphrase)
            .unwrap()
            .to_der()
            .unwrap();

        Self {
            der,
            passphrase: passphrase.to_string(),
            cert,
        }
    }
}
