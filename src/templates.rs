//! The C code templates.
//!
//! Templates are plain text with embedded control spans. `{%name%}` expands
//! the named symbol, `{%if (cond)%}` / `{%elif (cond)%}` / `{%else%}` /
//! `{%endif%}` select between variants. Conditions refer to symbols with a
//! `$` prefix; a symbol that cannot be resolved compares as `Undefined`.
//!
//! The templates reference each other by symbol name, so a single
//! `{%c_template%}` expansion pulls in everything a source file needs.

pub const H_TEMPLATE: &str = r#"{%source_header%}
#ifndef {%header_protection%}
#define {%header_protection%}

{%if ($include_files != Undefined)%}
{%include_files%}
{%endif%}
#include <stdlib.h>
{%if ($c_std != C89)%}
#include <stdint.h>
{%endif%}
{%if ($undefined_parameters == True and $c_std != C89)%}
#include <stdbool.h>
{%endif%}

#ifdef __cplusplus
extern "C" {
#endif


/**
 * The definition of the used algorithm.
 *
 * This is not used anywhere in the generated code, but it may be used by the
 * application code to call algoritm-specific code, is desired.
 *****************************************************************************/
{%if ($crc_algorithm == "bit-by-bit")%}
#define CRC_ALGO_BIT_BY_BIT 1
{%elif ($crc_algorithm == "bit-by-bit-fast")%}
#define CRC_ALGO_BIT_BY_BIT_FAST 1
{%elif ($crc_algorithm == "table-driven")%}
#define CRC_ALGO_TABLE_DRIVEN 1
{%else%}
#define CRC_ALGO_UNKNOWN 1
{%endif%}


/**
 * The type of the CRC values.
 *
 * This type must be big enough to contain at least {%cfg_width%} bits.
 *****************************************************************************/
typedef {%underlying_crc_t%} {%crc_t%};


{%if ($undefined_parameters == True)%}
/**
 * The configuration type of the CRC algorithm.
 *****************************************************************************/
typedef struct {
{%if ($crc_width == Undefined)%}
    unsigned int width;     /*!< The width of the polynomial */
{%endif%}
{%if ($crc_poly == Undefined)%}
    {%crc_t%} poly;             /*!< The CRC polynomial */
{%endif%}
{%if ($crc_reflect_in == Undefined)%}
    {%c_bool%} reflect_in;         /*!< Whether the input shall be reflected or not */
{%endif%}
{%if ($crc_xor_in == Undefined)%}
    {%crc_t%} xor_in;           /*!< The initial value of the algorithm */
{%endif%}
{%if ($crc_reflect_out == Undefined)%}
    {%c_bool%} reflect_out;        /*!< Wether the output shall be reflected or not */
{%endif%}
{%if ($crc_xor_out == Undefined)%}
    {%crc_t%} xor_out;          /*!< The value which shall be XOR-ed to the final CRC value */
{%endif%}
{%if ($crc_width == Undefined)%}

    /* internal parameters */
    {%crc_t%} msb_mask;             /*!< a bitmask with the Most Significant Bit set to 1
                                     initialise as (crc_t)1u << (width - 1) */
    {%crc_t%} crc_mask;             /*!< a bitmask with all width bits set to 1
                                     initialise as (cfg->msb_mask - 1) | cfg->msb_mask */
    unsigned int crc_shift;     /*!< a shift count that is used when width < 8
                                     initialise as cfg->width < 8 ? 8 - cfg->width : 0 */
{%endif%}
} {%cfg_t%};


{%endif%}
{%if ($use_reflect_func == True and $static_reflect_func != True)%}
{%crc_reflect_doc%}
{%crc_reflect_function_def%};


{%endif%}
{%if ($crc_algorithm == "table-driven" and $constant_crc_table != True)%}
{%crc_table_gen_doc%}
{%crc_table_gen_function_def%};


{%endif%}
{%crc_init_doc%}
{%if ($constant_crc_init == False)%}
{%crc_init_function_def%};
{%elif ($c_std == C89)%}
#define {%crc_init_function%}()      ({%crc_init_value%})
{%else%}
static inline {%crc_init_function_def%}
{
    return {%crc_init_value%};
}
{%endif%}


{%crc_update_doc%}
{%crc_update_function_def%};


{%crc_finalize_doc%}
{%if ($inline_crc_finalize == True)%}
{%if ($c_std == C89)%}
#define {%crc_finalize_function%}(crc)      ({%crc_final_value%})
{%else%}
static inline {%crc_finalize_function_def%}
{
    return {%crc_final_value%};
}
{%endif%}
{%else%}
{%crc_finalize_function_def%};
{%endif%}


#ifdef __cplusplus
}           /* closing brace for extern "C" */
#endif

#endif      /* {%header_protection%} */
"#;

pub const SOURCE_HEADER: &str = r#"/**
 * \file {%filename%}
 * Functions and types for CRC checks.
 *
 * Generated on {%datetime%},
 * by {%program_version%}, {%program_url%}
 * using the configuration:
 *    Width         = {%crc_width%}
 *    Poly          = {%crc_poly%}
 *    Xor_In        = {%crc_xor_in%}
 *    ReflectIn     = {%crc_reflect_in%}
 *    Xor_Out       = {%crc_xor_out%}
 *    ReflectOut    = {%crc_reflect_out%}
 *    Algorithm     = {%crc_algorithm%}
 *****************************************************************************/"#;

pub const CRC_REFLECT_DOC: &str = r#"/**
 * Reflect all bits of a \a data word of \a data_len bytes.
 *
 * \param data         The data word to be reflected.
 * \param data_len     The width of \a data expressed in number of bits.
 * \return             The reflected data.
 *****************************************************************************/"#;

pub const CRC_REFLECT_FUNCTION_DEF: &str =
    r#"{%crc_t%} {%crc_reflect_function%}({%crc_t%} data, size_t data_len)"#;

pub const CRC_REFLECT_FUNCTION_GEN: &str = r#"{%if ($use_reflect_func == True)%}
{%if ($crc_reflect_in == Undefined or $crc_reflect_in == True or $crc_reflect_out == Undefined or $crc_reflect_out == True)%}
{%crc_reflect_doc%}
{%crc_reflect_function_def%}
{
    unsigned int i;
    {%crc_t%} ret;

    ret = data & 0x01;
    for (i = 1; i < data_len; i++) {
        data >>= 1;
        ret = (ret << 1) | (data & 0x01);
    }
    return ret;
}


{%endif%}
{%endif%}"#;

pub const CRC_INIT_FUNCTION_GEN: &str = r#"{%if ($constant_crc_init == False)%}
{%crc_init_doc%}
{%crc_init_function_def%}
{
{%if ($crc_algorithm == "bit-by-bit")%}
    unsigned int i;
    {%c_bool%} bit;
    {%crc_t%} crc = {%cfg_xor_in%};
    for (i = 0; i < {%cfg_width%}; i++) {
        bit = crc & 0x01;
        if (bit) {
            crc = ((crc ^ {%cfg_poly%}) >> 1) | {%cfg_msb_mask%};
        } else {
            crc >>= 1;
        }
    }
    return crc & {%cfg_mask%};
{%elif ($crc_algorithm == "bit-by-bit-fast")%}
    return {%cfg_xor_in%} & {%cfg_mask%};
{%elif ($crc_algorithm == "table-driven")%}
{%if ($crc_reflect_in == Undefined)%}
    if ({%cfg_reflect_in%}) {
        return {%crc_reflect_function%}({%cfg_xor_in%} & {%cfg_mask%}, {%cfg_width%});
    } else {
        return {%cfg_xor_in%} & {%cfg_mask%};
    }
{%elif ($crc_reflect_in == True)%}
    return {%crc_reflect_function%}({%cfg_xor_in%} & {%cfg_mask%}, {%cfg_width%});
{%else%}
    return {%cfg_xor_in%} & {%cfg_mask%};
{%endif%}
{%endif%}
}


{%endif%}"#;

pub const CRC_UPDATE_FUNCTION_GEN: &str = r#"{%crc_table_driven_func_gen%}
{%crc_update_doc%}
{%crc_update_function_def%}
{
    const unsigned char *d = (const unsigned char *)data;
{%if ($crc_algorithm == "bit-by-bit")%}
    unsigned int i;
    {%c_bool%} bit;
    unsigned char c;

    while (data_len--) {
{%if ($crc_reflect_in == Undefined)%}
        if ({%cfg_reflect_in%}) {
            c = {%crc_reflect_function%}(*d++, 8);
        } else {
            c = *d++;
        }
{%elif ($crc_reflect_in == True)%}
        c = {%crc_reflect_function%}(*d++, 8);
{%else%}
        c = *d++;
{%endif%}
        for (i = 0; i < 8; i++) {
            bit = {%if ($c_std == C89)%}!!(crc & {%cfg_msb_mask%}){%else%}crc & {%cfg_msb_mask%}{%endif%};
            crc = (crc << 1) | ((c >> (7 - i)) & 0x01);
            if (bit) {
                crc ^= {%cfg_poly%};
            }
        }
        crc &= {%cfg_mask%};
    }
    return crc & {%cfg_mask%};
{%elif ($crc_algorithm == "bit-by-bit-fast")%}
    unsigned int i;
    {%c_bool%} bit;
    unsigned char c;

    while (data_len--) {
{%if ($crc_reflect_in == Undefined)%}
        if ({%cfg_reflect_in%}) {
            c = {%crc_reflect_function%}(*d++, 8);
        } else {
            c = *d++;
        }
{%else%}
        c = *d++;
{%endif%}
{%if ($crc_reflect_in == True)%}
        for (i = 0x01; i & 0xff; i <<= 1){%else%}
        for (i = 0x80; i > 0; i >>= 1){%endif%} {
            bit = {%if ($c_std == C89)%}!!(crc & {%cfg_msb_mask%}){%else%}crc & {%cfg_msb_mask%}{%endif%};
            if (c & i) {
                bit = !bit;
            }
            crc <<= 1;
            if (bit) {
                crc ^= {%cfg_poly%};
            }
        }
        crc &= {%cfg_mask%};
    }
    return crc & {%cfg_mask%};
{%elif ($crc_algorithm == "table-driven")%}
    unsigned int tbl_idx;

{%if ($crc_reflect_in == Undefined)%}
    if (cfg->reflect_in) {
        while (data_len--) {
{%crc_table_core_algorithm_reflected%}
            d++;
        }
    } else {
        while (data_len--) {
{%crc_table_core_algorithm_nonreflected%}
            d++;
        }
    }
{%else%}
    while (data_len--) {
{%if ($crc_reflect_in == True)%}
{%crc_table_core_algorithm_reflected%}
{%elif ($crc_reflect_in == False)%}
{%crc_table_core_algorithm_nonreflected%}
{%endif%}
        d++;
    }
{%endif%}
    return crc & {%cfg_mask%};
{%endif%}
}


"#;

pub const CRC_FINALIZE_FUNCTION_GEN: &str = r#"{%if ($inline_crc_finalize != True)%}
{%crc_finalize_doc%}
{%crc_finalize_function_def%}
{
{%if ($crc_algorithm == "bit-by-bit")%}
    unsigned int i;
    {%c_bool%} bit;

    for (i = 0; i < {%cfg_width%}; i++) {
        bit = {%if ($c_std == C89)%}!!(crc & {%cfg_msb_mask%}){%else%}crc & {%cfg_msb_mask%}{%endif%};
        crc = (crc << 1) | 0x00;
        if (bit) {
            crc ^= {%cfg_poly%};
        }
    }
{%if ($crc_reflect_out == Undefined)%}
    if ({%cfg_reflect_out%}) {
        crc = {%crc_reflect_function%}(crc, {%cfg_width%});
    }
{%elif ($crc_reflect_out == True)%}
    crc = {%crc_reflect_function%}(crc, {%cfg_width%});
{%endif%}
    return (crc ^ {%cfg_xor_out%}) & {%cfg_mask%};
{%elif ($crc_algorithm == "bit-by-bit-fast")%}
{%if ($crc_reflect_out == Undefined)%}
    if (cfg->reflect_out) {
        crc = {%crc_reflect_function%}(crc, {%cfg_width%});
    }
{%elif ($crc_reflect_out == True)%}
    crc = {%crc_reflect_function%}(crc, {%cfg_width%});
{%endif%}
    return (crc ^ {%cfg_xor_out%}) & {%cfg_mask%};
{%elif ($crc_algorithm == "table-driven")%}
{%if ($crc_reflect_in == Undefined or $crc_reflect_out == Undefined)%}
{%if ($crc_reflect_in == Undefined and $crc_reflect_out == Undefined)%}
    if (cfg->reflect_in == !cfg->reflect_out){%elif ($crc_reflect_out == Undefined)%}
    if ({%if ($crc_reflect_in == True)%}!{%endif%}cfg->reflect_out){%elif ($crc_reflect_in == Undefined)%}
    if ({%if ($crc_reflect_out == True)%}!{%endif%}cfg->reflect_in){%endif%} {
        crc = {%crc_reflect_function%}(crc, {%cfg_width%});
    }
{%elif ($crc_reflect_in != $crc_reflect_out)%}
    crc = {%crc_reflect_function%}(crc, {%cfg_width%});
{%endif%}
    return (crc ^ {%cfg_xor_out%}) & {%cfg_mask%};
{%endif%}
}


{%endif%}"#;

pub const CRC_TABLE_DRIVEN_FUNC_GEN: &str =
    r#"{%if ($crc_algorithm == "table-driven" and $constant_crc_table != True)%}
{%crc_table_gen_doc%}
{%crc_table_gen_function_def%}
{
    {%crc_t%} crc;
    unsigned int i, j;

    for (i = 0; i < {%cfg_table_width%}; i++) {
{%if ($crc_reflect_in == Undefined)%}
        if (cfg->reflect_in) {
            crc = {%crc_reflect_function%}(i, {%cfg_table_idx_width%});
        } else {
            crc = i;
        }
{%elif ($crc_reflect_in == True)%}
        crc = {%crc_reflect_function%}(i, {%cfg_table_idx_width%});
{%else%}
        crc = i;
{%endif%}
{%if ($crc_shift != 0)%}
        crc <<= ({%cfg_width%} - {%cfg_table_idx_width%} + {%cfg_shift%});
{%else%}
        crc <<= ({%cfg_width%} - {%cfg_table_idx_width%});
{%endif%}
        for (j = 0; j < {%cfg_table_idx_width%}; j++) {
            if (crc & {%cfg_msb_mask_shifted%}) {
                crc = (crc << 1) ^ {%cfg_poly_shifted%};
            } else {
                crc = crc << 1;
            }
        }
{%if ($crc_reflect_in == Undefined)%}
        if (cfg->reflect_in) {
{%if ($crc_shift != 0)%}
            crc = {%crc_reflect_function%}(crc >> {%cfg_shift%}, {%cfg_width%}) << {%cfg_shift%};
{%else%}
            crc = {%crc_reflect_function%}(crc, {%cfg_width%});
{%endif%}
        }
{%elif ($crc_reflect_in == True)%}
{%if ($crc_shift != 0)%}
        crc = {%crc_reflect_function%}(crc >> {%cfg_shift%}, {%cfg_width%}) << {%cfg_shift%};
{%else%}
        crc = {%crc_reflect_function%}(crc, {%cfg_width%});
{%endif%}
{%endif%}
        crc_table[i] = (crc & {%cfg_mask_shifted%}) >> {%cfg_shift%};
    }
}


{%endif%}"#;

pub const CRC_TABLE_GEN_DOC: &str = r#"/**
 * Populate the private static crc table.
 *
 * \param cfg  A pointer to a initialised {%cfg_t%} structure.
 * \return     void
 *****************************************************************************/"#;

pub const CRC_TABLE_GEN_FUNCTION_DEF: &str =
    r#"void {%crc_table_gen_function%}(const {%cfg_t%} *cfg)"#;

pub const CRC_INIT_DOC: &str = r#"/**
 * Calculate the initial crc value.
 *
{%if ($use_cfg_t == True)%}
 * \param cfg  A pointer to a initialised {%cfg_t%} structure.
{%endif%}
 * \return     The initial crc value.
 *****************************************************************************/"#;

pub const CRC_INIT_FUNCTION_DEF: &str = r#"{%if ($constant_crc_init == False)%}
{%crc_t%} {%crc_init_function%}(const {%cfg_t%} *cfg){%else%}
{%crc_t%} {%crc_init_function%}(void){%endif%}"#;

pub const CRC_UPDATE_DOC: &str = r#"/**
 * Update the crc value with new data.
 *
 * \param crc      The current crc value.
{%if ($simple_crc_update_def != True)%}
 * \param cfg      A pointer to a initialised {%cfg_t%} structure.
{%endif%}
 * \param data     Pointer to a buffer of \a data_len bytes.
 * \param data_len Number of bytes in the \a data buffer.
 * \return         The updated crc value.
 *****************************************************************************/"#;

pub const CRC_UPDATE_FUNCTION_DEF: &str = r#"{%if ($simple_crc_update_def != True)%}
{%crc_t%} {%crc_update_function%}(const {%cfg_t%} *cfg, {%crc_t%} crc, const void *data, size_t data_len){%else%}
{%crc_t%} {%crc_update_function%}({%crc_t%} crc, const void *data, size_t data_len){%endif%}"#;

pub const CRC_FINALIZE_DOC: &str = r#"/**
 * Calculate the final crc value.
 *
{%if ($simple_crc_finalize_def != True)%}
 * \param cfg  A pointer to a initialised {%cfg_t%} structure.
{%endif%}
 * \param crc  The current crc value.
 * \return     The final crc value.
 *****************************************************************************/"#;

pub const CRC_FINALIZE_FUNCTION_DEF: &str = r#"{%if ($simple_crc_finalize_def != True)%}
{%crc_t%} {%crc_finalize_function%}(const {%cfg_t%} *cfg, {%crc_t%} crc){%else%}
{%crc_t%} {%crc_finalize_function%}({%crc_t%} crc){%endif%}"#;

pub const C_TEMPLATE: &str = r#"{%source_header%}
{%if ($include_files != Undefined)%}
{%include_files%}
{%endif%}
#include "{%header_filename%}"     /* include the header file generated with crcgen */
#include <stdlib.h>
{%if ($c_std != C89)%}
#include <stdint.h>
{%if ($undefined_parameters == True or $crc_algorithm == "bit-by-bit" or $crc_algorithm == "bit-by-bit-fast")%}
#include <stdbool.h>
{%endif%}
{%endif%}

{%if ($use_reflect_func == True and $static_reflect_func == True)%}
static {%crc_reflect_function_def%};

{%endif%}
{%c_table_gen%}{%crc_reflect_function_gen%}{%crc_init_function_gen%}{%crc_update_function_gen%}{%crc_finalize_function_gen%}"#;

pub const C_TABLE_GEN: &str = r#"{%if ($crc_algorithm == "table-driven")%}
/**
 * Static table used for the table_driven implementation.
{%if ($undefined_parameters == True)%}
 * Must be initialised with the {%crc_init_function%} function.
{%endif%}
 *****************************************************************************/
{%if ($constant_crc_table != True)%}
static {%crc_t%} crc_table[{%crc_table_width%}];
{%else%}
static const {%crc_t%} crc_table[{%crc_table_width%}] = {%crc_table_init%};
{%endif%}

{%endif%}"#;

pub const MAIN_TEMPLATE: &str = r#"{%if ($include_files != Undefined)%}
{%include_files%}
{%endif%}
#include <stdio.h>
#include <getopt.h>
{%if ($undefined_parameters == True)%}
#include <stdlib.h>
#include <stdio.h>
#include <ctype.h>
{%endif%}
{%if ($c_std != C89)%}
#include <stdbool.h>
{%endif%}
#include <string.h>

static char str[256] = "123456789";
static {%c_bool%} verbose = {%c_false%};

void print_params({%if ($undefined_parameters == True)%}const {%cfg_t%} *cfg{%else%}void{%endif%});
{%getopt_template%}

void print_params({%if ($undefined_parameters == True)%}const {%cfg_t%} *cfg{%else%}void{%endif%})
{
    char format[20];

{%if ($c_std == C89)%}
    sprintf(format, "%%-16s = 0x%%0%dlx\n", (unsigned int)({%cfg_width%} + 3) / 4);
    printf("%-16s = %d\n", "width", (unsigned int){%cfg_width%});
    printf(format, "poly", (unsigned long int){%cfg_poly%});
    printf("%-16s = %s\n", "reflect_in", {%if ($crc_reflect_in == Undefined)%}{%cfg_reflect_in%} ? "true": "false"{%else%}{%if ($crc_reflect_in == True)%}"true"{%else%}"false"{%endif%}{%endif%});
    printf(format, "xor_in", (unsigned long int){%cfg_xor_in%});
    printf("%-16s = %s\n", "reflect_out", {%if ($crc_reflect_out == Undefined)%}{%cfg_reflect_out%} ? "true": "false"{%else%}{%if ($crc_reflect_out == True)%}"true"{%else%}"false"{%endif%}{%endif%});
    printf(format, "xor_out", (unsigned long int){%cfg_xor_out%});
    printf(format, "crc_mask", (unsigned long int){%cfg_mask%});
    printf(format, "msb_mask", (unsigned long int){%cfg_msb_mask%});
{%else%}
    snprintf(format, sizeof(format), "%%-16s = 0x%%0%dllx\n", (unsigned int)({%cfg_width%} + 3) / 4);
    printf("%-16s = %d\n", "width", (unsigned int){%cfg_width%});
    printf(format, "poly", (unsigned long long int){%cfg_poly%});
    printf("%-16s = %s\n", "reflect_in", {%if ($crc_reflect_in == Undefined)%}{%cfg_reflect_in%} ? "true": "false"{%else%}{%if ($crc_reflect_in == True)%}"true"{%else%}"false"{%endif%}{%endif%});
    printf(format, "xor_in", (unsigned long long int){%cfg_xor_in%});
    printf("%-16s = %s\n", "reflect_out", {%if ($crc_reflect_out == Undefined)%}{%cfg_reflect_out%} ? "true": "false"{%else%}{%if ($crc_reflect_out == True)%}"true"{%else%}"false"{%endif%}{%endif%});
    printf(format, "xor_out", (unsigned long long int){%cfg_xor_out%});
    printf(format, "crc_mask", (unsigned long long int){%cfg_mask%});
    printf(format, "msb_mask", (unsigned long long int){%cfg_msb_mask%});
{%endif%}
}

/**
 * C main function.
 *
 * \return     0 on success, != 0 on error.
 *****************************************************************************/
int main(int argc, char *argv[])
{
{%if ($undefined_parameters == True)%}
    {%cfg_t%} cfg = {
{%if ($crc_width == Undefined)%}
            0,      /* width */
{%endif%}
{%if ($crc_poly == Undefined)%}
            0,      /* poly */
{%endif%}
{%if ($crc_xor_in == Undefined)%}
            0,      /* xor_in */
{%endif%}
{%if ($crc_reflect_in == Undefined)%}
            0,      /* reflect_in */
{%endif%}
{%if ($crc_xor_out == Undefined)%}
            0,      /* xor_out */
{%endif%}
{%if ($crc_reflect_out == Undefined)%}
            0,      /* reflect_out */
{%endif%}
{%if ($crc_width == Undefined)%}

            0,      /* crc_mask */
            0,      /* msb_mask */
            0,      /* crc_shift */
{%endif%}
    };
{%endif%}
    {%crc_t%} crc;

{%if ($undefined_parameters == True)%}
    get_config(argc, argv, &cfg);
{%else%}
    get_config(argc, argv);
{%endif%}
{%if ($crc_algorithm == "table-driven" and $constant_crc_table != True)%}
    {%crc_table_gen_function%}(&cfg);
{%endif%}
    crc = {%crc_init_function%}({%if ($constant_crc_init != True)%}&cfg{%endif%});
    crc = {%crc_update_function%}({%if ($simple_crc_update_def != True)%}&cfg, {%endif%}crc, (void *)str, strlen(str));
    crc = {%crc_finalize_function%}({%if ($simple_crc_finalize_def != True)%}&cfg, {%endif%}crc);

    if (verbose) {
        print_params({%if ($undefined_parameters == True)%}&cfg{%endif%});
    }
{%if ($c_std == C89)%}
    printf("0x%lx\n", (unsigned long int)crc);
{%else%}
    printf("0x%llx\n", (unsigned long long int)crc);
{%endif%}
    return 0;
}
"#;

pub const GETOPT_TEMPLATE: &str =
    r#"{%if ($crc_reflect_in == Undefined or $crc_reflect_out == Undefined)%}
static {%c_bool%} atob(const char *str);
{%endif%}
{%if ($crc_poly == Undefined or $crc_xor_in == Undefined or $crc_xor_out == Undefined)%}
static crc_t xtoi(const char *str);
{%endif%}
static int get_config(int argc, char *argv[]{%if ($undefined_parameters == True)%}, {%cfg_t%} *cfg{%endif%});


{%if ($crc_reflect_in == Undefined or $crc_reflect_out == Undefined)%}
{%c_bool%} atob(const char *str)
{
    if (!str) {
        return 0;
    }
    if (isdigit(str[0])) {
        return ({%c_bool%})atoi(str);
    }
    if (tolower(str[0]) == 't') {
        return {%c_true%};
    }
    return {%c_false%};
}

{%endif%}
{%if ($crc_poly == Undefined or $crc_xor_in == Undefined or $crc_xor_out == Undefined)%}
crc_t xtoi(const char *str)
{
    crc_t ret = 0;

    if (!str) {
        return 0;
    }
    if (str[0] == '0' && tolower(str[1]) == 'x') {
        str += 2;
        while (*str) {
            if (isdigit(*str))
                ret = 16 * ret + *str - '0';
            else if (isxdigit(*str))
                ret = 16 * ret + tolower(*str) - 'a' + 10;
            else
                return ret;
            str++;
        }
    } else if (isdigit(*str)) {
        while (*str) {
            if (isdigit(*str))
                ret = 10 * ret + *str - '0';
            else
                return ret;
            str++;
        }
    }
    return ret;
}


{%endif%}
static int get_config(int argc, char *argv[]{%if ($undefined_parameters == True)%}, {%cfg_t%} *cfg{%endif%})
{
    int c;
    int option_index;
    static struct option long_options[] = {
{%if ($crc_width == Undefined)%}
        {"width",           1, 0, 'w'},
{%endif%}
{%if ($crc_poly == Undefined)%}
        {"poly",            1, 0, 'p'},
{%endif%}
{%if ($crc_reflect_in == Undefined)%}
        {"reflect-in",      1, 0, 'n'},
{%endif%}
{%if ($crc_xor_in == Undefined)%}
        {"xor-in",          1, 0, 'i'},
{%endif%}
{%if ($crc_reflect_out == Undefined)%}
        {"reflect-out",     1, 0, 'u'},
{%endif%}
{%if ($crc_xor_out == Undefined)%}
        {"xor-out",         1, 0, 'o'},
{%endif%}
        {"verbose",         0, 0, 'v'},
        {"check-string",    1, 0, 's'},
{%if ($crc_width == Undefined)%}
        {"table-idx-with",  1, 0, 't'},
{%endif%}
        {0, 0, 0, 0}
    };

    while (1) {
        option_index = 0;

        c = getopt_long(argc, argv, "w:p:n:i:u:o:s:vt", long_options, &option_index);
        if (c == -1)
            break;

        switch (c) {
            case 0:
                printf("option %s", long_options[option_index].name);
                if (optarg)
                    printf(" with arg %s", optarg);
                printf("\n");
{%if ($crc_width == Undefined)%}
            case 'w':
                cfg->width = atoi(optarg);
                break;
{%endif%}
{%if ($crc_poly == Undefined)%}
            case 'p':
                cfg->poly = xtoi(optarg);
                break;
{%endif%}
{%if ($crc_reflect_in == Undefined)%}
            case 'n':
                cfg->reflect_in = atob(optarg);
                break;
{%endif%}
{%if ($crc_xor_in == Undefined)%}
            case 'i':
                cfg->xor_in = xtoi(optarg);
                break;
{%endif%}
{%if ($crc_reflect_out == Undefined)%}
            case 'u':
                cfg->reflect_out = atob(optarg);
                break;
{%endif%}
{%if ($crc_xor_out == Undefined)%}
            case 'o':
                cfg->xor_out = xtoi(optarg);
                break;
{%endif%}
            case 's':
                memcpy(str, optarg, strlen(optarg) < sizeof(str) ? strlen(optarg) + 1 : sizeof(str));
                str[sizeof(str) - 1] = '\0';
                break;
            case 'v':
                verbose = {%c_true%};
                break;
{%if ($crc_width == Undefined)%}
            case 't':
                /* ignore --table_idx_width option */
                break;
{%endif%}
            case '?':
                return -1;
            case ':':
                fprintf(stderr, "missing argument to option %c\n", c);
                return -1;
            default:
                fprintf(stderr, "unhandled option %c\n", c);
                return -1;
        }
    }
{%if ($crc_width == Undefined)%}
    cfg->msb_mask = (crc_t)1u << (cfg->width - 1);
    cfg->crc_mask = (cfg->msb_mask - 1) | cfg->msb_mask;
    cfg->crc_shift = cfg->width < 8 ? 8 - cfg->width : 0;
{%endif%}

{%if ($crc_poly == Undefined)%}
    cfg->poly &= {%cfg_mask%};
{%endif%}
{%if ($crc_xor_in == Undefined)%}
    cfg->xor_in &= {%cfg_mask%};
{%endif%}
{%if ($crc_xor_out == Undefined)%}
    cfg->xor_out &= {%cfg_mask%};
{%endif%}
    return 0;
}"#;
