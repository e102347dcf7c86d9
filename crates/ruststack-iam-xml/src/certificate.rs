//! Unmarshallers for signing-certificate shapes.

use ruststack_iam_model::{
    ListSigningCertificatesResult, SigningCertificate, UploadSigningCertificateResult,
};

use crate::cursor::StaxCursor;
use crate::error::XmlError;
use crate::scalar;
use crate::unmarshall::{Field, FieldTable, StaxUnmarshaller};

/// Unmarshaller for [`SigningCertificate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SigningCertificateUnmarshaller;

/// Shared stateless instance.
pub static SIGNING_CERTIFICATE: SigningCertificateUnmarshaller = SigningCertificateUnmarshaller;

static SIGNING_CERTIFICATE_FIELDS: FieldTable<SigningCertificate> = FieldTable::new(
    "SigningCertificate",
    &[
        Field {
            expression: "UserName",
            decode: |cert, cursor| {
                cert.user_name = Some(scalar::string(cursor)?);
                Ok(())
            },
        },
        Field {
            expression: "CertificateId",
            decode: |cert, cursor| {
                cert.certificate_id = Some(scalar::string(cursor)?);
                Ok(())
            },
        },
        Field {
            expression: "CertificateBody",
            decode: |cert, cursor| {
                cert.certificate_body = Some(scalar::string(cursor)?);
                Ok(())
            },
        },
        Field {
            expression: "Status",
            decode: |cert, cursor| {
                cert.status = Some(scalar::string(cursor)?);
                Ok(())
            },
        },
        Field {
            expression: "UploadDate",
            decode: |cert, cursor| {
                cert.upload_date = Some(scalar::timestamp(cursor)?);
                Ok(())
            },
        },
    ],
);

impl SigningCertificateUnmarshaller {
    /// Field expressions this unmarshaller recognises.
    pub fn expressions(&self) -> impl Iterator<Item = &'static str> {
        SIGNING_CERTIFICATE_FIELDS.expressions()
    }
}

impl StaxUnmarshaller for SigningCertificateUnmarshaller {
    type Output = SigningCertificate;

    fn unmarshall(&self, cursor: &mut StaxCursor<'_>) -> Result<SigningCertificate, XmlError> {
        SIGNING_CERTIFICATE_FIELDS.unmarshall(cursor)
    }
}

/// Unmarshaller for [`UploadSigningCertificateResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadSigningCertificateResultUnmarshaller;

/// Shared stateless instance.
pub static UPLOAD_SIGNING_CERTIFICATE_RESULT: UploadSigningCertificateResultUnmarshaller =
    UploadSigningCertificateResultUnmarshaller;

static UPLOAD_SIGNING_CERTIFICATE_RESULT_FIELDS: FieldTable<UploadSigningCertificateResult> =
    FieldTable::new(
        "UploadSigningCertificateResult",
        &[Field {
            expression: "Certificate",
            decode: |result, cursor| {
                result.certificate = Some(SIGNING_CERTIFICATE.unmarshall(cursor)?);
                Ok(())
            },
        }],
    );

impl StaxUnmarshaller for UploadSigningCertificateResultUnmarshaller {
    type Output = UploadSigningCertificateResult;

    fn unmarshall(
        &self,
        cursor: &mut StaxCursor<'_>,
    ) -> Result<UploadSigningCertificateResult, XmlError> {
        UPLOAD_SIGNING_CERTIFICATE_RESULT_FIELDS.unmarshall(cursor)
    }
}

/// Unmarshaller for [`ListSigningCertificatesResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSigningCertificatesResultUnmarshaller;

/// Shared stateless instance.
pub static LIST_SIGNING_CERTIFICATES_RESULT: ListSigningCertificatesResultUnmarshaller =
    ListSigningCertificatesResultUnmarshaller;

static LIST_SIGNING_CERTIFICATES_RESULT_FIELDS: FieldTable<ListSigningCertificatesResult> =
    FieldTable::new(
        "ListSigningCertificatesResult",
        &[
            Field {
                expression: "Certificates/member",
                decode: |result, cursor| {
                    result
                        .certificates
                        .push(SIGNING_CERTIFICATE.unmarshall(cursor)?);
                    Ok(())
                },
            },
            Field {
                expression: "IsTruncated",
                decode: |result, cursor| {
                    result.is_truncated = Some(scalar::boolean(cursor)?);
                    Ok(())
                },
            },
            Field {
                expression: "Marker",
                decode: |result, cursor| {
                    result.marker = Some(scalar::string(cursor)?);
                    Ok(())
                },
            },
        ],
    );

impl StaxUnmarshaller for ListSigningCertificatesResultUnmarshaller {
    type Output = ListSigningCertificatesResult;

    fn unmarshall(
        &self,
        cursor: &mut StaxCursor<'_>,
    ) -> Result<ListSigningCertificatesResult, XmlError> {
        LIST_SIGNING_CERTIFICATES_RESULT_FIELDS.unmarshall(cursor)
    }
}
